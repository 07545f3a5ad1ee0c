//! Packet decoder
//!
//! Turns one received datagram into a [`Packet`]. The first byte selects
//! the body reader; each reader consumes exactly the fields its kind
//! defines and leaves any trailing bytes alone.

use serde::Serialize;

use super::codec::{CodecError, CodecResult, Reader, Vector3};
use super::kinds::{EventKind, PacketKind};

/// Wire value used by the server when a car id is absent
pub const NO_CAR_ID: u8 = 255;

/// Session description, sent on session start and on request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionInfo {
    pub protocol_version: u8,
    pub session_index: u8,
    pub current_session_index: u8,
    pub session_count: u8,
    pub server_name: String,
    pub track: String,
    pub track_config: String,
    pub name: String,
    pub session_type: u8,
    /// Time limit in minutes
    pub time: u16,
    pub laps: u16,
    pub wait_time: u16,
    pub ambient_temp: u8,
    pub road_temp: u8,
    pub weather_graphics: String,
    /// Milliseconds since the session start; negative while a race is
    /// still in its wait period
    pub elapsed_ms: i32,
}

/// A driver joining or leaving the server
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionEvent {
    pub driver_name: String,
    pub driver_guid: String,
    pub car_id: u8,
    pub car_model: String,
    pub car_skin: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarInfo {
    pub car_id: u8,
    pub is_connected: bool,
    pub car_model: String,
    pub car_skin: String,
    pub driver_name: String,
    pub driver_team: String,
    pub driver_guid: String,
}

/// Realtime position report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarUpdate {
    pub car_id: u8,
    pub position: Vector3,
    pub velocity: Vector3,
    pub gear: u8,
    pub engine_rpm: u16,
    /// Position along the track spline, 0..1
    pub normalized_spline_pos: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub car_id: u8,
    pub time: u32,
    pub laps: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LapCompleted {
    pub car_id: u8,
    pub lap_time: u32,
    pub cuts: u8,
    /// In the order the server wrote them
    pub leaderboard: Vec<LeaderboardEntry>,
    pub grip_level: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientEvent {
    pub kind: EventKind,
    pub car_id: u8,
    /// Only present for [`EventKind::CollisionWithCar`]
    pub other_car_id: Option<u8>,
    pub impact_speed: f32,
    pub world_pos: Vector3,
    pub rel_pos: Vector3,
}

impl ClientEvent {
    /// Second car id as the server writes it, [`NO_CAR_ID`] when absent
    pub fn other_car_wire_id(&self) -> u8 {
        self.other_car_id.unwrap_or(NO_CAR_ID)
    }
}

/// A decoded server notification
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "packet", rename_all = "snake_case")]
pub enum Packet {
    NewSession(SessionInfo),
    NewConnection(ConnectionEvent),
    ConnectionClosed(ConnectionEvent),
    CarUpdate(CarUpdate),
    CarInfo(CarInfo),
    EndSession { report_path: String },
    Version { protocol_version: u8 },
    Chat { car_id: u8, message: String },
    ClientLoaded { car_id: u8 },
    SessionInfo(SessionInfo),
    Error { message: String },
    LapCompleted(LapCompleted),
    ClientEvent(ClientEvent),
}

impl Packet {
    /// The packet kind this record was decoded from
    pub fn kind(&self) -> PacketKind {
        match self {
            Packet::NewSession(_) => PacketKind::NewSession,
            Packet::NewConnection(_) => PacketKind::NewConnection,
            Packet::ConnectionClosed(_) => PacketKind::ConnectionClosed,
            Packet::CarUpdate(_) => PacketKind::CarUpdate,
            Packet::CarInfo(_) => PacketKind::CarInfo,
            Packet::EndSession { .. } => PacketKind::EndSession,
            Packet::Version { .. } => PacketKind::Version,
            Packet::Chat { .. } => PacketKind::Chat,
            Packet::ClientLoaded { .. } => PacketKind::ClientLoaded,
            Packet::SessionInfo(_) => PacketKind::SessionInfo,
            Packet::Error { .. } => PacketKind::Error,
            Packet::LapCompleted(_) => PacketKind::LapCompleted,
            Packet::ClientEvent(_) => PacketKind::ClientEvent,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// The car this packet is about, if any
    pub fn car_id(&self) -> Option<u8> {
        match self {
            Packet::NewConnection(c) | Packet::ConnectionClosed(c) => Some(c.car_id),
            Packet::CarUpdate(u) => Some(u.car_id),
            Packet::CarInfo(i) => Some(i.car_id),
            Packet::Chat { car_id, .. } | Packet::ClientLoaded { car_id } => Some(*car_id),
            Packet::LapCompleted(l) => Some(l.car_id),
            Packet::ClientEvent(e) => Some(e.car_id),
            _ => None,
        }
    }

    /// The session record, for both session packet kinds
    pub fn session_info(&self) -> Option<&SessionInfo> {
        match self {
            Packet::NewSession(info) | Packet::SessionInfo(info) => Some(info),
            _ => None,
        }
    }
}

/// Records that can be read field by field from a [`Reader`]
trait Decode: Sized {
    fn decode(r: &mut Reader<'_>) -> CodecResult<Self>;
}

impl Decode for SessionInfo {
    fn decode(r: &mut Reader<'_>) -> CodecResult<Self> {
        Ok(Self {
            protocol_version: r.read_u8()?,
            session_index: r.read_u8()?,
            current_session_index: r.read_u8()?,
            session_count: r.read_u8()?,
            server_name: r.read_wide_string()?,
            track: r.read_narrow_string()?,
            track_config: r.read_narrow_string()?,
            name: r.read_narrow_string()?,
            session_type: r.read_u8()?,
            time: r.read_u16()?,
            laps: r.read_u16()?,
            wait_time: r.read_u16()?,
            ambient_temp: r.read_u8()?,
            road_temp: r.read_u8()?,
            weather_graphics: r.read_narrow_string()?,
            elapsed_ms: r.read_i32()?,
        })
    }
}

impl Decode for ConnectionEvent {
    fn decode(r: &mut Reader<'_>) -> CodecResult<Self> {
        Ok(Self {
            driver_name: r.read_wide_string()?,
            driver_guid: r.read_wide_string()?,
            car_id: r.read_u8()?,
            car_model: r.read_narrow_string()?,
            car_skin: r.read_narrow_string()?,
        })
    }
}

impl Decode for CarInfo {
    fn decode(r: &mut Reader<'_>) -> CodecResult<Self> {
        Ok(Self {
            car_id: r.read_u8()?,
            is_connected: r.read_bool()?,
            car_model: r.read_wide_string()?,
            car_skin: r.read_wide_string()?,
            driver_name: r.read_wide_string()?,
            driver_team: r.read_wide_string()?,
            driver_guid: r.read_wide_string()?,
        })
    }
}

impl Decode for CarUpdate {
    fn decode(r: &mut Reader<'_>) -> CodecResult<Self> {
        Ok(Self {
            car_id: r.read_u8()?,
            position: r.read_vector3()?,
            velocity: r.read_vector3()?,
            gear: r.read_u8()?,
            engine_rpm: r.read_u16()?,
            normalized_spline_pos: r.read_f32()?,
        })
    }
}

impl Decode for LeaderboardEntry {
    fn decode(r: &mut Reader<'_>) -> CodecResult<Self> {
        Ok(Self {
            car_id: r.read_u8()?,
            time: r.read_u32()?,
            laps: r.read_u16()?,
        })
    }
}

impl Decode for LapCompleted {
    fn decode(r: &mut Reader<'_>) -> CodecResult<Self> {
        let car_id = r.read_u8()?;
        let lap_time = r.read_u32()?;
        let cuts = r.read_u8()?;

        let count = r.read_u8()? as usize;
        let leaderboard = (0..count)
            .map(|_| LeaderboardEntry::decode(r))
            .collect::<CodecResult<Vec<_>>>()?;

        Ok(Self {
            car_id,
            lap_time,
            cuts,
            leaderboard,
            grip_level: r.read_f32()?,
        })
    }
}

impl Decode for ClientEvent {
    fn decode(r: &mut Reader<'_>) -> CodecResult<Self> {
        let tag = r.read_u8()?;
        let kind = EventKind::from_tag(tag).ok_or(CodecError::UnknownEventKind(tag))?;
        let car_id = r.read_u8()?;

        let other_car_id = match kind {
            EventKind::CollisionWithCar => Some(r.read_u8()?),
            EventKind::CollisionWithEnv => None,
        };

        Ok(Self {
            kind,
            car_id,
            other_car_id,
            impact_speed: r.read_f32()?,
            world_pos: r.read_vector3()?,
            rel_pos: r.read_vector3()?,
        })
    }
}

/// Reads the body of one packet kind. The kind is passed in so readers
/// shared between kinds know which variant to build.
type BodyReader = fn(PacketKind, &mut Reader<'_>) -> CodecResult<Packet>;

fn body_reader(kind: PacketKind) -> BodyReader {
    match kind {
        PacketKind::NewSession | PacketKind::SessionInfo => read_session,
        PacketKind::NewConnection | PacketKind::ConnectionClosed => read_connection,
        PacketKind::CarUpdate => read_car_update,
        PacketKind::CarInfo => read_car_info,
        PacketKind::EndSession => read_end_session,
        PacketKind::Version => read_version,
        PacketKind::Chat => read_chat,
        PacketKind::ClientLoaded => read_client_loaded,
        PacketKind::Error => read_error,
        PacketKind::LapCompleted => read_lap_completed,
        PacketKind::ClientEvent => read_client_event,
    }
}

fn read_session(kind: PacketKind, r: &mut Reader<'_>) -> CodecResult<Packet> {
    let info = SessionInfo::decode(r)?;
    Ok(match kind {
        PacketKind::NewSession => Packet::NewSession(info),
        _ => Packet::SessionInfo(info),
    })
}

fn read_connection(kind: PacketKind, r: &mut Reader<'_>) -> CodecResult<Packet> {
    let event = ConnectionEvent::decode(r)?;
    Ok(match kind {
        PacketKind::NewConnection => Packet::NewConnection(event),
        _ => Packet::ConnectionClosed(event),
    })
}

fn read_car_update(_: PacketKind, r: &mut Reader<'_>) -> CodecResult<Packet> {
    CarUpdate::decode(r).map(Packet::CarUpdate)
}

fn read_car_info(_: PacketKind, r: &mut Reader<'_>) -> CodecResult<Packet> {
    CarInfo::decode(r).map(Packet::CarInfo)
}

fn read_lap_completed(_: PacketKind, r: &mut Reader<'_>) -> CodecResult<Packet> {
    LapCompleted::decode(r).map(Packet::LapCompleted)
}

fn read_client_event(_: PacketKind, r: &mut Reader<'_>) -> CodecResult<Packet> {
    ClientEvent::decode(r).map(Packet::ClientEvent)
}

fn read_end_session(_: PacketKind, r: &mut Reader<'_>) -> CodecResult<Packet> {
    Ok(Packet::EndSession {
        report_path: r.read_wide_string()?,
    })
}

fn read_version(_: PacketKind, r: &mut Reader<'_>) -> CodecResult<Packet> {
    Ok(Packet::Version {
        protocol_version: r.read_u8()?,
    })
}

fn read_chat(_: PacketKind, r: &mut Reader<'_>) -> CodecResult<Packet> {
    Ok(Packet::Chat {
        car_id: r.read_u8()?,
        message: r.read_wide_string()?,
    })
}

fn read_client_loaded(_: PacketKind, r: &mut Reader<'_>) -> CodecResult<Packet> {
    Ok(Packet::ClientLoaded {
        car_id: r.read_u8()?,
    })
}

fn read_error(_: PacketKind, r: &mut Reader<'_>) -> CodecResult<Packet> {
    Ok(Packet::Error {
        message: r.read_wide_string()?,
    })
}

/// Decode one datagram. Bytes past the end of the packet's fields are
/// ignored.
pub fn decode(bytes: &[u8]) -> CodecResult<Packet> {
    decode_prefix(bytes).map(|(packet, _)| packet)
}

/// Decode the packet at the start of `bytes`, returning it together with
/// the number of bytes it occupied.
pub fn decode_prefix(bytes: &[u8]) -> CodecResult<(Packet, usize)> {
    let mut reader = Reader::new(bytes);
    let tag = reader.read_u8()?;
    let kind = PacketKind::from_tag(tag).ok_or(CodecError::UnknownTag(tag))?;

    let packet = body_reader(kind)(kind, &mut reader)?;
    Ok((packet, reader.position()))
}

/// Iterator over back-to-back packets, as found in a capture file
///
/// Stops at the end of the buffer, or after yielding the first error.
pub struct PacketStream<'a> {
    bytes: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> PacketStream<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            offset: 0,
            failed: false,
        }
    }

    /// Offset of the next unread byte
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Iterator for PacketStream<'_> {
    type Item = CodecResult<Packet>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.bytes.len() {
            return None;
        }

        match decode_prefix(&self.bytes[self.offset..]) {
            Ok((packet, used)) => {
                self.offset += used;
                Some(Ok(packet))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::codec::WireWrite;
    use bytes::{BufMut, BytesMut};

    fn put_narrow(buf: &mut BytesMut, text: &str) {
        buf.put_u8(text.len() as u8);
        buf.put_slice(text.as_bytes());
    }

    fn session_body() -> BytesMut {
        let mut buf = BytesMut::new();
        buf.put_u8(4); // protocol version
        buf.put_u8(1); // session index
        buf.put_u8(1); // current session index
        buf.put_u8(3); // session count
        buf.put_wide_string("AC Server ! JU").unwrap();
        put_narrow(&mut buf, "monza");
        put_narrow(&mut buf, "");
        put_narrow(&mut buf, "Qualify");
        buf.put_u8(2);
        buf.put_u16_le(30);
        buf.put_u16_le(0);
        buf.put_u16_le(60);
        buf.put_u8(25);
        buf.put_u8(32);
        put_narrow(&mut buf, "3_clear");
        buf.put_i32_le(-15000);
        buf
    }

    fn with_tag(tag: PacketKind, body: &[u8]) -> Vec<u8> {
        let mut data = vec![tag.tag()];
        data.extend_from_slice(body);
        data
    }

    #[test]
    fn test_decode_version() {
        let packet = decode(&[56, 4]).unwrap();
        assert_eq!(packet, Packet::Version { protocol_version: 4 });
        assert_eq!(packet.kind(), PacketKind::Version);
    }

    #[test]
    fn test_decode_car_update() {
        let mut buf = BytesMut::new();
        buf.put_u8(PacketKind::CarUpdate.tag());
        buf.put_u8(3);
        buf.put_vector3(&Vector3::new(1.0, 2.0, 3.0));
        buf.put_vector3(&Vector3::default());
        buf.put_u8(2);
        buf.put_u16_le(4500);
        buf.put_f32_le(0.25);

        let packet = decode(&buf).unwrap();
        assert_eq!(
            packet,
            Packet::CarUpdate(CarUpdate {
                car_id: 3,
                position: Vector3::new(1.0, 2.0, 3.0),
                velocity: Vector3::new(0.0, 0.0, 0.0),
                gear: 2,
                engine_rpm: 4500,
                normalized_spline_pos: 0.25,
            })
        );
        assert_eq!(packet.car_id(), Some(3));
    }

    #[test]
    fn test_decode_session_info() {
        let data = with_tag(PacketKind::SessionInfo, &session_body());
        let packet = decode(&data).unwrap();

        let info = packet.session_info().unwrap();
        assert_eq!(info.protocol_version, 4);
        assert_eq!(info.session_count, 3);
        assert_eq!(info.server_name, "AC Server ! JU");
        assert_eq!(info.track, "monza");
        assert_eq!(info.track_config, "");
        assert_eq!(info.name, "Qualify");
        assert_eq!(info.time, 30);
        assert_eq!(info.wait_time, 60);
        assert_eq!(info.ambient_temp, 25);
        assert_eq!(info.road_temp, 32);
        assert_eq!(info.weather_graphics, "3_clear");
        assert_eq!(info.elapsed_ms, -15000);
    }

    #[test]
    fn test_new_session_and_session_info_share_body() {
        let body = session_body();
        let new_session = decode(&with_tag(PacketKind::NewSession, &body)).unwrap();
        let session_info = decode(&with_tag(PacketKind::SessionInfo, &body)).unwrap();

        assert_eq!(new_session.kind(), PacketKind::NewSession);
        assert_eq!(session_info.kind(), PacketKind::SessionInfo);
        assert_eq!(new_session.session_info(), session_info.session_info());
    }

    #[test]
    fn test_decode_connection_events() {
        let mut body = BytesMut::new();
        body.put_wide_string("Mario").unwrap();
        body.put_wide_string("76561198000000000").unwrap();
        body.put_u8(7);
        put_narrow(&mut body, "ks_ferrari_488_gt3");
        put_narrow(&mut body, "red");

        let opened = decode(&with_tag(PacketKind::NewConnection, &body)).unwrap();
        let closed = decode(&with_tag(PacketKind::ConnectionClosed, &body)).unwrap();

        let expected = ConnectionEvent {
            driver_name: "Mario".into(),
            driver_guid: "76561198000000000".into(),
            car_id: 7,
            car_model: "ks_ferrari_488_gt3".into(),
            car_skin: "red".into(),
        };
        assert_eq!(opened, Packet::NewConnection(expected.clone()));
        assert_eq!(closed, Packet::ConnectionClosed(expected));
    }

    #[test]
    fn test_decode_car_info() {
        let mut buf = BytesMut::new();
        buf.put_u8(PacketKind::CarInfo.tag());
        buf.put_u8(2);
        buf.put_u8(1);
        for field in ["bmw_m3_e30", "0_official", "Luigi", "Team", "1234"] {
            buf.put_wide_string(field).unwrap();
        }

        match decode(&buf).unwrap() {
            Packet::CarInfo(info) => {
                assert_eq!(info.car_id, 2);
                assert!(info.is_connected);
                assert_eq!(info.car_model, "bmw_m3_e30");
                assert_eq!(info.car_skin, "0_official");
                assert_eq!(info.driver_name, "Luigi");
                assert_eq!(info.driver_team, "Team");
                assert_eq!(info.driver_guid, "1234");
            }
            other => panic!("Wrong packet: {:?}", other),
        }
    }

    #[test]
    fn test_decode_lap_completed_preserves_order() {
        let mut buf = BytesMut::new();
        buf.put_u8(PacketKind::LapCompleted.tag());
        buf.put_u8(5);
        buf.put_u32_le(92_345);
        buf.put_u8(1);
        buf.put_u8(3);
        for (id, time, laps) in [(5u8, 92_345u32, 4u16), (0, 95_000, 4), (9, 0, 3)] {
            buf.put_u8(id);
            buf.put_u32_le(time);
            buf.put_u16_le(laps);
        }
        buf.put_f32_le(0.98);

        match decode(&buf).unwrap() {
            Packet::LapCompleted(lap) => {
                assert_eq!(lap.car_id, 5);
                assert_eq!(lap.lap_time, 92_345);
                assert_eq!(lap.cuts, 1);
                let ids: Vec<u8> = lap.leaderboard.iter().map(|e| e.car_id).collect();
                assert_eq!(ids, vec![5, 0, 9]);
                assert_eq!(
                    lap.leaderboard[2],
                    LeaderboardEntry {
                        car_id: 9,
                        time: 0,
                        laps: 3
                    }
                );
                assert_eq!(lap.grip_level, 0.98);
            }
            other => panic!("Wrong packet: {:?}", other),
        }
    }

    #[test]
    fn test_decode_lap_completed_empty_leaderboard() {
        let mut buf = BytesMut::new();
        buf.put_u8(PacketKind::LapCompleted.tag());
        buf.put_u8(1);
        buf.put_u32_le(60_000);
        buf.put_u8(0);
        buf.put_u8(0);
        buf.put_f32_le(1.0);

        match decode(&buf).unwrap() {
            Packet::LapCompleted(lap) => {
                assert!(lap.leaderboard.is_empty());
                assert_eq!(lap.grip_level, 1.0);
            }
            other => panic!("Wrong packet: {:?}", other),
        }
    }

    #[test]
    fn test_decode_collision_with_car() {
        let mut buf = BytesMut::new();
        buf.put_u8(PacketKind::ClientEvent.tag());
        buf.put_u8(EventKind::CollisionWithCar.tag());
        buf.put_u8(1);
        buf.put_u8(4);
        buf.put_f32_le(33.5);
        buf.put_vector3(&Vector3::new(10.0, 0.5, -20.0));
        buf.put_vector3(&Vector3::new(0.1, 0.2, 0.3));

        match decode(&buf).unwrap() {
            Packet::ClientEvent(event) => {
                assert_eq!(event.kind, EventKind::CollisionWithCar);
                assert_eq!(event.car_id, 1);
                assert_eq!(event.other_car_id, Some(4));
                assert_eq!(event.impact_speed, 33.5);
                assert_eq!(event.world_pos, Vector3::new(10.0, 0.5, -20.0));
                assert_eq!(event.rel_pos, Vector3::new(0.1, 0.2, 0.3));
            }
            other => panic!("Wrong packet: {:?}", other),
        }
    }

    #[test]
    fn test_decode_collision_with_env_has_no_other_car() {
        let mut buf = BytesMut::new();
        buf.put_u8(PacketKind::ClientEvent.tag());
        buf.put_u8(EventKind::CollisionWithEnv.tag());
        buf.put_u8(6);
        buf.put_f32_le(12.0);
        buf.put_vector3(&Vector3::new(1.0, 2.0, 3.0));
        buf.put_vector3(&Vector3::new(4.0, 5.0, 6.0));

        let (packet, used) = decode_prefix(&buf).unwrap();
        assert_eq!(used, buf.len());
        match packet {
            Packet::ClientEvent(event) => {
                assert_eq!(event.other_car_id, None);
                assert_eq!(event.other_car_wire_id(), NO_CAR_ID);
                assert_eq!(event.impact_speed, 12.0);
                assert_eq!(event.rel_pos, Vector3::new(4.0, 5.0, 6.0));
            }
            other => panic!("Wrong packet: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_event_kind() {
        let data = [PacketKind::ClientEvent.tag(), 12, 0];
        assert_eq!(decode(&data), Err(CodecError::UnknownEventKind(12)));
    }

    #[test]
    fn test_decode_string_packets() {
        let mut chat = BytesMut::new();
        chat.put_u8(PacketKind::Chat.tag());
        chat.put_u8(3);
        chat.put_wide_string("gg").unwrap();
        assert_eq!(
            decode(&chat).unwrap(),
            Packet::Chat {
                car_id: 3,
                message: "gg".into()
            }
        );

        let mut end = BytesMut::new();
        end.put_u8(PacketKind::EndSession.tag());
        end.put_wide_string("results/2026_10_18.json").unwrap();
        assert_eq!(
            decode(&end).unwrap(),
            Packet::EndSession {
                report_path: "results/2026_10_18.json".into()
            }
        );

        let mut error = BytesMut::new();
        error.put_u8(PacketKind::Error.tag());
        error.put_wide_string("Invalid car id").unwrap();
        assert_eq!(
            decode(&error).unwrap(),
            Packet::Error {
                message: "Invalid car id".into()
            }
        );

        assert_eq!(
            decode(&[PacketKind::ClientLoaded.tag(), 8]).unwrap(),
            Packet::ClientLoaded { car_id: 8 }
        );
    }

    #[test]
    fn test_unknown_tag() {
        assert_eq!(decode(&[0x69, 1, 2]), Err(CodecError::UnknownTag(0x69)));
    }

    #[test]
    fn test_empty_buffer_is_truncated() {
        assert!(matches!(
            decode(&[]),
            Err(CodecError::TruncatedBuffer { .. })
        ));
    }

    #[test]
    fn test_truncated_packets() {
        let session = with_tag(PacketKind::SessionInfo, &session_body());
        for len in 1..session.len() {
            assert!(
                matches!(decode(&session[..len]), Err(CodecError::TruncatedBuffer { .. })),
                "prefix of length {} decoded",
                len
            );
        }

        // Collision with a car needs the second car id
        let mut buf = BytesMut::new();
        buf.put_u8(PacketKind::ClientEvent.tag());
        buf.put_u8(EventKind::CollisionWithCar.tag());
        buf.put_u8(1);
        buf.put_u8(2);
        buf.put_f32_le(1.0);
        buf.put_vector3(&Vector3::default());
        buf.put_vector3(&Vector3::default());
        assert!(matches!(
            decode(&buf[..buf.len() - 1]),
            Err(CodecError::TruncatedBuffer { .. })
        ));
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let (packet, used) = decode_prefix(&[56, 4, 0xDE, 0xAD]).unwrap();
        assert_eq!(packet, Packet::Version { protocol_version: 4 });
        assert_eq!(used, 2);
    }

    #[test]
    fn test_packet_stream() {
        let mut data = vec![56, 4];
        data.extend(with_tag(PacketKind::SessionInfo, &session_body()));
        data.extend([58, 2]);

        let packets: Vec<_> = PacketStream::new(&data).collect::<Result<_, _>>().unwrap();
        let kinds: Vec<_> = packets.iter().map(Packet::kind).collect();
        assert_eq!(
            kinds,
            vec![
                PacketKind::Version,
                PacketKind::SessionInfo,
                PacketKind::ClientLoaded
            ]
        );
    }

    #[test]
    fn test_packet_stream_stops_after_error() {
        let data = [56, 4, 58];
        let mut stream = PacketStream::new(&data);

        assert!(stream.next().unwrap().is_ok());
        assert_eq!(stream.offset(), 2);
        assert!(matches!(
            stream.next(),
            Some(Err(CodecError::TruncatedBuffer { .. }))
        ));
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_serialize_json() {
        let packet = Packet::ClientLoaded { car_id: 8 };
        let json = serde_json::to_value(&packet).unwrap();
        assert_eq!(json["packet"], "client_loaded");
        assert_eq!(json["car_id"], 8);
    }
}
