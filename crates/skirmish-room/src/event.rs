//! Transport events consumed by the connection manager.

use serde::{Deserialize, Serialize};
use skirmish_protocol::{PlayerId, RoomId};

/// An event emitted by the real-time transport.
///
/// Each variant maps 1:1 onto a [`ConnectionManager`](crate::ConnectionManager)
/// operation, see [`ConnectionManager::apply`](crate::ConnectionManager::apply).
///
/// Internally tagged, so a roster update looks like
/// `{ "type": "Participants", "room_id": 3, "participants": [1, 2] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RoomEvent {
    /// The client has (re)joined `room_id`.
    Connected { room_id: RoomId },

    /// The transport dropped. Applies to every room at once.
    Disconnected,

    /// The authoritative roster for `room_id`. Replaces the local list.
    Participants {
        room_id: RoomId,
        participants: Vec<PlayerId>,
    },

    /// An advisory error; the connection may still be up.
    Error { message: String },
}
