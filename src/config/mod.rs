//! Configuration module
//!
//! Handles loading and saving acudp configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::network::NetworkConfig;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// Socket settings
    #[serde(default)]
    pub network: NetworkConfig,

    /// What `listen` asks the server for on startup
    #[serde(default)]
    pub listen: ListenConfig,
}

/// General configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging
    #[serde(default)]
    pub verbose: bool,
    /// Print packets as JSON lines instead of log records
    #[serde(default)]
    pub json: bool,
}

/// Listen configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListenConfig {
    /// Realtime car update interval in ms, 0 to leave them off
    #[serde(default = "default_realtime_interval")]
    pub realtime_interval_ms: u16,
    /// Request the current session info once bound
    #[serde(default = "default_true")]
    pub request_session_info: bool,
    /// Request car info for every driver that connects
    #[serde(default)]
    pub request_car_info: bool,
}

fn default_realtime_interval() -> u16 {
    1000
}

fn default_true() -> bool {
    true
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            realtime_interval_ms: default_realtime_interval(),
            request_session_info: default_true(),
            request_car_info: false,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the default location
    pub fn load_default() -> ConfigResult<Self> {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("acudp/config.toml")),
            Some(PathBuf::from("./acudp.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                tracing::debug!("Loading configuration from {}", path.display());
                return Self::load(path);
            }
        }

        Ok(Self::default())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Generate a sample configuration file
pub fn generate_sample_config() -> ConfigResult<String> {
    let config = Config {
        network: NetworkConfig::new(12000, "127.0.0.1", 11000),
        listen: ListenConfig {
            realtime_interval_ms: 250,
            request_session_info: true,
            request_car_info: true,
        },
        ..Default::default()
    };

    Ok(toml::to_string_pretty(&config)?)
}
