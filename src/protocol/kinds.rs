//! Protocol table
//!
//! Tag bytes for every inbound packet, outbound command and client event
//! kind. These values are fixed by the server and must not change.

use serde::Serialize;

/// Notifications sent by the server to the plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum PacketKind {
    NewSession = 50,
    NewConnection = 51,
    ConnectionClosed = 52,
    CarUpdate = 53,
    /// Sent in response to [`CommandKind::GetCarInfo`]
    CarInfo = 54,
    EndSession = 55,
    Version = 56,
    Chat = 57,
    ClientLoaded = 58,
    SessionInfo = 59,
    Error = 60,
    LapCompleted = 73,
    ClientEvent = 130,
}

impl PacketKind {
    pub const ALL: [PacketKind; 13] = [
        PacketKind::NewSession,
        PacketKind::NewConnection,
        PacketKind::ConnectionClosed,
        PacketKind::CarUpdate,
        PacketKind::CarInfo,
        PacketKind::EndSession,
        PacketKind::Version,
        PacketKind::Chat,
        PacketKind::ClientLoaded,
        PacketKind::SessionInfo,
        PacketKind::Error,
        PacketKind::LapCompleted,
        PacketKind::ClientEvent,
    ];

    /// Get the wire tag
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Look up a packet kind by its wire tag
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            50 => Some(PacketKind::NewSession),
            51 => Some(PacketKind::NewConnection),
            52 => Some(PacketKind::ConnectionClosed),
            53 => Some(PacketKind::CarUpdate),
            54 => Some(PacketKind::CarInfo),
            55 => Some(PacketKind::EndSession),
            56 => Some(PacketKind::Version),
            57 => Some(PacketKind::Chat),
            58 => Some(PacketKind::ClientLoaded),
            59 => Some(PacketKind::SessionInfo),
            60 => Some(PacketKind::Error),
            73 => Some(PacketKind::LapCompleted),
            130 => Some(PacketKind::ClientEvent),
            _ => None,
        }
    }

    /// Protocol name of this kind, as the server documentation spells it
    pub fn name(self) -> &'static str {
        match self {
            PacketKind::NewSession => "ACSP_NEW_SESSION",
            PacketKind::NewConnection => "ACSP_NEW_CONNECTION",
            PacketKind::ConnectionClosed => "ACSP_CONNECTION_CLOSED",
            PacketKind::CarUpdate => "ACSP_CAR_UPDATE",
            PacketKind::CarInfo => "ACSP_CAR_INFO",
            PacketKind::EndSession => "ACSP_END_SESSION",
            PacketKind::Version => "ACSP_VERSION",
            PacketKind::Chat => "ACSP_CHAT",
            PacketKind::ClientLoaded => "ACSP_CLIENT_LOADED",
            PacketKind::SessionInfo => "ACSP_SESSION_INFO",
            PacketKind::Error => "ACSP_ERROR",
            PacketKind::LapCompleted => "ACSP_LAP_COMPLETED",
            PacketKind::ClientEvent => "ACSP_CLIENT_EVENT",
        }
    }
}

/// Commands sent by the plugin to the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommandKind {
    RealtimePosInterval = 200,
    GetCarInfo = 201,
    /// Chat to a single car
    SendChat = 202,
    /// Chat to everybody
    BroadcastChat = 203,
    GetSessionInfo = 204,
    SetSessionInfo = 205,
    KickUser = 206,
    NextSession = 207,
    RestartSession = 208,
    AdminCommand = 209,
}

impl CommandKind {
    pub const ALL: [CommandKind; 10] = [
        CommandKind::RealtimePosInterval,
        CommandKind::GetCarInfo,
        CommandKind::SendChat,
        CommandKind::BroadcastChat,
        CommandKind::GetSessionInfo,
        CommandKind::SetSessionInfo,
        CommandKind::KickUser,
        CommandKind::NextSession,
        CommandKind::RestartSession,
        CommandKind::AdminCommand,
    ];

    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    pub fn name(self) -> &'static str {
        match self {
            CommandKind::RealtimePosInterval => "ACSP_REALTIMEPOS_INTERVAL",
            CommandKind::GetCarInfo => "ACSP_GET_CAR_INFO",
            CommandKind::SendChat => "ACSP_SEND_CHAT",
            CommandKind::BroadcastChat => "ACSP_BROADCAST_CHAT",
            CommandKind::GetSessionInfo => "ACSP_GET_SESSION_INFO",
            CommandKind::SetSessionInfo => "ACSP_SET_SESSION_INFO",
            CommandKind::KickUser => "ACSP_KICK_USER",
            CommandKind::NextSession => "ACSP_NEXT_SESSION",
            CommandKind::RestartSession => "ACSP_RESTART_SESSION",
            CommandKind::AdminCommand => "ACSP_ADMIN_COMMAND",
        }
    }
}

/// Event types carried inside a client event packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum EventKind {
    CollisionWithCar = 10,
    CollisionWithEnv = 11,
}

impl EventKind {
    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            10 => Some(EventKind::CollisionWithCar),
            11 => Some(EventKind::CollisionWithEnv),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EventKind::CollisionWithCar => "ACSP_CE_COLLISION_WITH_CAR",
            EventKind::CollisionWithEnv => "ACSP_CE_COLLISION_WITH_ENV",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_packet_tags_unique_and_reversible() {
        let tags: HashSet<u8> = PacketKind::ALL.iter().map(|k| k.tag()).collect();
        assert_eq!(tags.len(), PacketKind::ALL.len());

        for kind in PacketKind::ALL {
            assert_eq!(PacketKind::from_tag(kind.tag()), Some(kind));
        }
    }

    #[test]
    fn test_command_tags_unique_and_reversible() {
        let tags: HashSet<u8> = CommandKind::ALL.iter().map(|k| k.tag()).collect();
        assert_eq!(tags.len(), CommandKind::ALL.len());

        for kind in CommandKind::ALL {
            assert_eq!(CommandKind::from_tag(kind.tag()), Some(kind));
        }
    }

    #[test]
    fn test_known_tag_values() {
        assert_eq!(PacketKind::LapCompleted.tag(), 73);
        assert_eq!(PacketKind::ClientEvent.tag(), 130);
        assert_eq!(CommandKind::AdminCommand.tag(), 209);
        assert_eq!(EventKind::CollisionWithEnv.tag(), 11);
    }

    #[test]
    fn test_unknown_tags() {
        assert_eq!(PacketKind::from_tag(0), None);
        assert_eq!(PacketKind::from_tag(200), None);
        assert_eq!(CommandKind::from_tag(53), None);
        assert_eq!(EventKind::from_tag(12), None);
    }

    #[test]
    fn test_names() {
        assert_eq!(PacketKind::CarUpdate.name(), "ACSP_CAR_UPDATE");
        assert_eq!(CommandKind::KickUser.name(), "ACSP_KICK_USER");
        assert_eq!(EventKind::CollisionWithCar.name(), "ACSP_CE_COLLISION_WITH_CAR");
    }
}
