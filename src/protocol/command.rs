//! Command encoder
//!
//! Every command is a tag byte followed by a fixed field layout. Encoding
//! is all-or-nothing: a command that cannot be encoded leaves the output
//! buffer untouched.

use bytes::{BufMut, Bytes, BytesMut};

use super::codec::{CodecResult, WireWrite};
use super::kinds::CommandKind;

/// Session index meaning "the session currently running"
pub const CURRENT_SESSION: i16 = -1;

/// Arguments of [`Command::SetSessionInfo`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub session_index: u8,
    pub name: String,
    pub session_type: u8,
    pub laps: u32,
    pub time_seconds: u32,
    pub wait_seconds: u32,
}

/// A command the plugin can send to the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Realtime car updates every `interval_ms`; 0 turns them off
    RealtimePosInterval { interval_ms: u16 },
    /// Answered with a car info packet
    GetCarInfo { car_id: u8 },
    SendChat { car_id: u8, message: String },
    BroadcastChat { message: String },
    /// Answered with a session info packet; see [`CURRENT_SESSION`]
    GetSessionInfo { session_index: i16 },
    SetSessionInfo(SessionSettings),
    KickUser { car_id: u8 },
    NextSession,
    RestartSession,
    AdminCommand { command: String },
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::RealtimePosInterval { .. } => CommandKind::RealtimePosInterval,
            Command::GetCarInfo { .. } => CommandKind::GetCarInfo,
            Command::SendChat { .. } => CommandKind::SendChat,
            Command::BroadcastChat { .. } => CommandKind::BroadcastChat,
            Command::GetSessionInfo { .. } => CommandKind::GetSessionInfo,
            Command::SetSessionInfo(_) => CommandKind::SetSessionInfo,
            Command::KickUser { .. } => CommandKind::KickUser,
            Command::NextSession => CommandKind::NextSession,
            Command::RestartSession => CommandKind::RestartSession,
            Command::AdminCommand { .. } => CommandKind::AdminCommand,
        }
    }

    /// Encode into a new buffer
    pub fn encode(&self) -> CodecResult<Bytes> {
        let mut buf = BytesMut::with_capacity(16);
        self.encode_into(&mut buf)?;
        Ok(buf.freeze())
    }

    /// Append the encoded command to `buf`
    pub fn encode_into(&self, buf: &mut BytesMut) -> CodecResult<()> {
        let start = buf.len();
        buf.put_u8(self.kind().tag());

        if let Err(e) = self.encode_body(buf) {
            buf.truncate(start);
            return Err(e);
        }
        Ok(())
    }

    fn encode_body(&self, buf: &mut BytesMut) -> CodecResult<()> {
        match self {
            Command::RealtimePosInterval { interval_ms } => buf.put_u16_le(*interval_ms),
            Command::GetCarInfo { car_id } | Command::KickUser { car_id } => buf.put_u8(*car_id),
            Command::SendChat { car_id, message } => {
                buf.put_u8(*car_id);
                buf.put_wide_string(message)?;
            }
            Command::BroadcastChat { message } => buf.put_wide_string(message)?,
            Command::GetSessionInfo { session_index } => buf.put_i16_le(*session_index),
            Command::SetSessionInfo(settings) => {
                buf.put_u8(settings.session_index);
                buf.put_wide_string(&settings.name)?;
                buf.put_u8(settings.session_type);
                buf.put_u32_le(settings.laps);
                buf.put_u32_le(settings.time_seconds);
                buf.put_u32_le(settings.wait_seconds);
            }
            Command::NextSession | Command::RestartSession => {}
            Command::AdminCommand { command } => buf.put_wide_string(command)?,
        }
        Ok(())
    }
}
