//! Packet dispatch to subscribers
//!
//! Subscribers implement [`PacketHandler`] and override the callbacks for
//! the packet kinds they care about.

use crate::protocol::{
    CarInfo, CarUpdate, ClientEvent, ConnectionEvent, LapCompleted, Packet, SessionInfo,
};

/// Callbacks for decoded packets. Every method defaults to doing nothing.
pub trait PacketHandler: Send {
    /// Called for every packet, before the kind-specific callback
    fn on_packet(&mut self, _packet: &Packet) {}

    fn on_new_session(&mut self, _info: &SessionInfo) {}
    fn on_session_info(&mut self, _info: &SessionInfo) {}
    fn on_new_connection(&mut self, _event: &ConnectionEvent) {}
    fn on_connection_closed(&mut self, _event: &ConnectionEvent) {}
    fn on_car_update(&mut self, _update: &CarUpdate) {}
    fn on_car_info(&mut self, _info: &CarInfo) {}
    fn on_end_session(&mut self, _report_path: &str) {}
    fn on_version(&mut self, _protocol_version: u8) {}
    fn on_chat(&mut self, _car_id: u8, _message: &str) {}
    fn on_client_loaded(&mut self, _car_id: u8) {}
    fn on_error(&mut self, _message: &str) {}
    fn on_lap_completed(&mut self, _lap: &LapCompleted) {}
    fn on_client_event(&mut self, _event: &ClientEvent) {}
}

/// Identifies a registered subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Routes each packet to every subscriber, in subscription order
#[derive(Default)]
pub struct Dispatcher {
    next_id: u64,
    subscribers: Vec<(SubscriberId, Box<dyn PacketHandler>)>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, handler: Box<dyn PacketHandler>) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, handler));
        id
    }

    /// Remove a subscriber. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn dispatch(&mut self, packet: &Packet) {
        for (_, handler) in &mut self.subscribers {
            handler.on_packet(packet);
            route(handler.as_mut(), packet);
        }
    }
}

fn route(handler: &mut dyn PacketHandler, packet: &Packet) {
    match packet {
        Packet::NewSession(info) => handler.on_new_session(info),
        Packet::SessionInfo(info) => handler.on_session_info(info),
        Packet::NewConnection(event) => handler.on_new_connection(event),
        Packet::ConnectionClosed(event) => handler.on_connection_closed(event),
        Packet::CarUpdate(update) => handler.on_car_update(update),
        Packet::CarInfo(info) => handler.on_car_info(info),
        Packet::EndSession { report_path } => handler.on_end_session(report_path),
        Packet::Version { protocol_version } => handler.on_version(*protocol_version),
        Packet::Chat { car_id, message } => handler.on_chat(*car_id, message),
        Packet::ClientLoaded { car_id } => handler.on_client_loaded(*car_id),
        Packet::Error { message } => handler.on_error(message),
        Packet::LapCompleted(lap) => handler.on_lap_completed(lap),
        Packet::ClientEvent(event) => handler.on_client_event(event),
    }
}
