//! Network module - UDP transport for the plugin side
//!
//! Provides:
//! - Client that receives notifications and sends commands
//! - Dispatcher that routes decoded packets to subscribers

mod client;
mod dispatch;

pub use client::*;
pub use dispatch::*;

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::protocol::{DEFAULT_PLUGIN_PORT, DEFAULT_SERVER_PORT, MAX_DATAGRAM_SIZE};

/// Configuration for the plugin socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Local address to bind to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Local port the server sends notifications to
    #[serde(default = "default_local_port")]
    pub local_port: u16,
    /// Server host that receives commands
    #[serde(default = "default_server_host")]
    pub server_host: String,
    /// Server port that receives commands
    #[serde(default = "default_server_port")]
    pub server_port: u16,
    /// Receive buffer size in bytes
    #[serde(default = "default_recv_buffer_size")]
    pub recv_buffer_size: usize,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_local_port() -> u16 {
    DEFAULT_PLUGIN_PORT
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    DEFAULT_SERVER_PORT
}

fn default_recv_buffer_size() -> usize {
    MAX_DATAGRAM_SIZE
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            local_port: default_local_port(),
            server_host: default_server_host(),
            server_port: default_server_port(),
            recv_buffer_size: default_recv_buffer_size(),
        }
    }
}

impl NetworkConfig {
    pub fn new(local_port: u16, server_host: impl Into<String>, server_port: u16) -> Self {
        Self {
            local_port,
            server_host: server_host.into(),
            server_port,
            ..Default::default()
        }
    }

    pub fn with_bind_address(mut self, bind_address: impl Into<String>) -> Self {
        self.bind_address = bind_address.into();
        self
    }
}

/// Resolve a hostname to a socket address
pub async fn resolve_host(host: &str, port: u16) -> std::io::Result<SocketAddr> {
    use tokio::net::lookup_host;

    let addr_string = format!("{}:{}", host, port);
    let mut addrs = lookup_host(&addr_string).await?;

    addrs.next().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Could not resolve host: {}", host),
        )
    })
}
