//! Connection manager: per-room connectivity and membership.
//!
//! This is a plain synchronous reducer. It never blocks and never talks
//! to the network; the [`RoomFeed`](crate::RoomFeed) translates transport
//! events into calls on it.
//!
//! Reconnection only flips flags here. Pulling fresh state after a
//! reconnect is the session directory's job (fetch/join), not ours.

use std::collections::HashMap;

use skirmish_protocol::{PlayerId, RoomId};

use crate::{Room, RoomError, RoomEvent};

/// Tracks every room this client knows about plus global link status.
#[derive(Debug, Clone, Default)]
pub struct ConnectionManager {
    /// Rooms keyed by ID.
    rooms: HashMap<RoomId, Room>,

    /// Whether the transport link is up.
    connected: bool,

    /// Set when the link dropped and the transport is retrying.
    reconnecting: bool,

    /// Latest advisory error message.
    error: Option<String>,
}

impl ConnectionManager {
    /// Creates an empty manager: no rooms, not connected.
    pub fn new() -> Self {
        Self::default()
    }

    /// The client connected to `room_id`.
    ///
    /// Creates the room, or resets it if it already exists: the roster is
    /// emptied until the server sends a fresh one. Clears the global error
    /// and reconnecting flags.
    pub fn connected(&mut self, room_id: RoomId) {
        self.rooms.insert(room_id, Room::connected(room_id));
        self.connected = true;
        self.reconnecting = false;
        self.error = None;
        tracing::info!(%room_id, "room connected");
    }

    /// The transport dropped.
    ///
    /// Every room is marked disconnected but keeps its participant list.
    pub fn disconnected(&mut self) {
        self.connected = false;
        self.reconnecting = true;
        for room in self.rooms.values_mut() {
            room.connected = false;
        }
        tracing::info!(rooms = self.rooms.len(), "transport disconnected");
    }

    /// Records the latest error message without touching connection flags.
    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(%message, "transport error");
        self.error = Some(message);
    }

    /// Replaces the roster of an existing room.
    ///
    /// # Errors
    /// Returns [`RoomError::NotFound`] for rooms this client never
    /// connected to; the roster is discarded in that case.
    pub fn update_room_participants(
        &mut self,
        room_id: RoomId,
        participants: Vec<PlayerId>,
    ) -> Result<(), RoomError> {
        let room = self
            .rooms
            .get_mut(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;
        room.participants = participants;
        tracing::debug!(%room_id, count = room.participants.len(), "roster updated");
        Ok(())
    }

    /// Forgets a room entirely. Unknown rooms are a no-op.
    pub fn leave_room(&mut self, room_id: RoomId) {
        if self.rooms.remove(&room_id).is_some() {
            tracing::info!(%room_id, "left room");
        }
    }

    /// Applies a transport event, translating it 1:1 into an operation.
    pub fn apply(&mut self, event: RoomEvent) {
        match event {
            RoomEvent::Connected { room_id } => self.connected(room_id),
            RoomEvent::Disconnected => self.disconnected(),
            RoomEvent::Participants {
                room_id,
                participants,
            } => {
                if let Err(e) = self.update_room_participants(room_id, participants) {
                    tracing::debug!(error = %e, "ignoring roster for unknown room");
                }
            }
            RoomEvent::Error { message } => self.error(message),
        }
    }

    // -- Views ------------------------------------------------------------

    /// Looks up a room.
    pub fn room(&self, room_id: RoomId) -> Option<&Room> {
        self.rooms.get(&room_id)
    }

    /// Whether `room_id` exists and is connected.
    pub fn is_room_connected(&self, room_id: RoomId) -> bool {
        self.rooms.get(&room_id).is_some_and(|r| r.connected)
    }

    /// Participant count for a room, 0 for unknown rooms.
    pub fn participant_count(&self, room_id: RoomId) -> usize {
        self.rooms.get(&room_id).map_or(0, Room::participant_count)
    }

    /// IDs of all tracked rooms, sorted for stable display.
    pub fn room_ids(&self) -> Vec<RoomId> {
        let mut ids: Vec<RoomId> = self.rooms.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Whether the transport link is up.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Whether the transport is retrying after a drop.
    pub fn is_reconnecting(&self) -> bool {
        self.reconnecting
    }

    /// Latest advisory error.
    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
