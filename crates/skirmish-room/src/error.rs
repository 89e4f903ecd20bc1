//! Error types for the room layer.

use skirmish_protocol::RoomId;

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room is not tracked by this client.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// The transport failed while the feed was reading from it.
    #[error("connection lost: {0}")]
    ConnectionLost(String),
}
