//! A single real-time room as seen by this client.

use serde::{Deserialize, Serialize};
use skirmish_protocol::{PlayerId, RoomId};

/// Local view of one room.
///
/// A room is a logical broadcast channel. It is independent of any game
/// session: the same room may outlive the session view that opened it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// The room's unique ID.
    pub room_id: RoomId,

    /// Whether the transport currently delivers events for this room.
    pub connected: bool,

    /// Last roster received for the room, in server order.
    ///
    /// Kept across disconnects so the UI can still show who was there
    /// while the transport reconnects.
    pub participants: Vec<PlayerId>,
}

impl Room {
    /// A freshly connected room with an empty roster.
    pub fn connected(room_id: RoomId) -> Self {
        Self {
            room_id,
            connected: true,
            participants: Vec::new(),
        }
    }

    /// Number of participants in the last known roster.
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }
}
