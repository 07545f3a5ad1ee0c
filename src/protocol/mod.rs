//! Protocol module - The plugin wire protocol
//!
//! Every datagram is a single packet:
//! - 1 byte tag (packet kind from the server, command kind from the plugin)
//! - Fixed field layout for that kind, numbers little-endian
//!
//! Decoding and encoding are stateless; the only shared data is the
//! constant tag table ([`PacketKind`], [`CommandKind`], [`EventKind`]).

mod codec;
mod command;
mod kinds;
mod packet;

pub use codec::*;
pub use command::*;
pub use kinds::*;
pub use packet::*;

/// Protocol version this codec was written against
pub const PROTOCOL_VERSION: u8 = 4;

/// Port the plugin listens on by default
pub const DEFAULT_PLUGIN_PORT: u16 = 10000;

/// Port the server receives plugin commands on by default
pub const DEFAULT_SERVER_PORT: u16 = 10001;

/// Receive buffer size that fits any UDP payload
pub const MAX_DATAGRAM_SIZE: usize = 65_536;
