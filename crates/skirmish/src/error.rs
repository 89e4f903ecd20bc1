//! Unified error type for Skirmish.

use skirmish_combat::CombatError;
use skirmish_protocol::ProtocolError;
use skirmish_room::RoomError;
use skirmish_session::SessionError;
use skirmish_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `skirmish` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate.
#[derive(Debug, thiserror::Error)]
pub enum SkirmishError {
    /// A transport-level error (connect, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session directory request was rejected.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A room-level error (unknown room, lost connection).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// A combat validation error (not your turn, unknown participant...).
    #[error(transparent)]
    Combat(#[from] CombatError),

    /// The operation needs a current session and there is none.
    #[error("no current session")]
    NoCurrentSession,
}
