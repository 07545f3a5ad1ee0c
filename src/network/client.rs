//! Plugin client
//!
//! Owns the UDP socket shared by notifications and commands. Each received
//! datagram is decoded once; each command is encoded and sent once. There
//! is no buffering or retrying here.

use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::UdpSocket;

use super::{resolve_host, NetworkConfig};
use crate::protocol::{self, CodecError, Command, Packet, SessionSettings};

/// Client errors
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed datagram from {from}: {source}")]
    Malformed {
        from: SocketAddr,
        #[source]
        source: CodecError,
    },

    #[error("Encode error: {0}")]
    Encode(#[from] CodecError),

    #[error("Short send: {sent} of {expected} bytes")]
    ShortSend { sent: usize, expected: usize },
}

pub type ClientResult<T> = Result<T, ClientError>;

/// UDP endpoint of a server plugin
pub struct PluginClient {
    socket: UdpSocket,
    server_addr: SocketAddr,
    recv_buf: Vec<u8>,
}

impl PluginClient {
    /// Bind the local socket and resolve the server address
    pub async fn bind(config: &NetworkConfig) -> ClientResult<Self> {
        let socket = UdpSocket::bind((config.bind_address.as_str(), config.local_port)).await?;
        let server_addr = resolve_host(&config.server_host, config.server_port).await?;

        tracing::info!(
            "Plugin socket bound on {}, server at {}",
            socket.local_addr()?,
            server_addr
        );

        Ok(Self {
            socket,
            server_addr,
            recv_buf: vec![0u8; config.recv_buffer_size],
        })
    }

    pub fn local_addr(&self) -> ClientResult<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    /// Receive and decode one datagram
    pub async fn recv(&mut self) -> ClientResult<(Packet, SocketAddr)> {
        let (len, from) = self.socket.recv_from(&mut self.recv_buf).await?;
        tracing::trace!("Received {} bytes from {}", len, from);

        let packet = protocol::decode(&self.recv_buf[..len])
            .map_err(|source| ClientError::Malformed { from, source })?;
        Ok((packet, from))
    }

    /// Receive the next well-formed packet, skipping malformed datagrams
    pub async fn next_packet(&mut self) -> ClientResult<Packet> {
        loop {
            match self.recv().await {
                Ok((packet, _)) => return Ok(packet),
                Err(ClientError::Malformed { from, source }) => {
                    tracing::warn!("Dropping malformed datagram from {}: {}", from, source);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Encode and send one command to the server
    pub async fn send(&self, command: &Command) -> ClientResult<()> {
        let data = command.encode()?;
        let sent = self.socket.send_to(&data, self.server_addr).await?;

        if sent != data.len() {
            return Err(ClientError::ShortSend {
                sent,
                expected: data.len(),
            });
        }

        tracing::debug!("Sent {} ({} bytes)", command.kind().name(), sent);
        Ok(())
    }

    /// Ask for car updates every `interval_ms`; 0 disables them
    pub async fn enable_realtime_report(&self, interval_ms: u16) -> ClientResult<()> {
        self.send(&Command::RealtimePosInterval { interval_ms }).await
    }

    pub async fn get_car_info(&self, car_id: u8) -> ClientResult<()> {
        self.send(&Command::GetCarInfo { car_id }).await
    }

    pub async fn get_session_info(&self, session_index: i16) -> ClientResult<()> {
        self.send(&Command::GetSessionInfo { session_index }).await
    }

    pub async fn set_session_info(&self, settings: SessionSettings) -> ClientResult<()> {
        self.send(&Command::SetSessionInfo(settings)).await
    }

    pub async fn send_chat(&self, car_id: u8, message: &str) -> ClientResult<()> {
        self.send(&Command::SendChat {
            car_id,
            message: message.to_string(),
        })
        .await
    }

    pub async fn broadcast_chat(&self, message: &str) -> ClientResult<()> {
        self.send(&Command::BroadcastChat {
            message: message.to_string(),
        })
        .await
    }

    pub async fn kick_user(&self, car_id: u8) -> ClientResult<()> {
        self.send(&Command::KickUser { car_id }).await
    }

    pub async fn admin_command(&self, command: &str) -> ClientResult<()> {
        self.send(&Command::AdminCommand {
            command: command.to_string(),
        })
        .await
    }
}
