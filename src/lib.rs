//! acudp - Plugin-side codec for the racing-simulation server UDP protocol
//!
//! The server pushes telemetry, session and event notifications to a plugin
//! over UDP; the plugin may answer with administrative commands.
//!
//! - [`protocol`] decodes notifications and encodes commands (stateless)
//! - [`network`] is a thin UDP transport and subscriber dispatch on top
//! - [`config`] loads the TOML configuration used by the binary

pub mod config;
pub mod network;
pub mod protocol;
