//! Core protocol types shared by every Skirmish crate.
//!
//! This module defines the identity types that name things across the
//! system (players, rooms, sessions, campaigns, combat participants) and
//! the [`Envelope`] that wraps every event travelling over the wire.
//!
//! Think of this as the vocabulary the DM's client, each player's client
//! and the backend authority share.

// Serde is Rust's standard library for **ser**ializing and
// **de**serializing data. Every type here crosses a process boundary at
// some point (websocket frames, persistence responses), so all of them
// derive both traits.
use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Declares a `u64` newtype identifier with a prefixed `Display`.
///
/// Newtype wrappers give type safety: you can't pass a `RoomId` where a
/// `SessionId` is expected, even though both are `u64` underneath.
/// `#[serde(transparent)]` keeps the wire form a plain number, so
/// `SessionId(42)` is just `42` in JSON.
macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }
    };
}

id_type!(
    /// A unique identifier for a player (the DM is a player too).
    PlayerId,
    "P"
);

id_type!(
    /// A unique identifier for a real-time room: a logical channel that
    /// groups connected clients. Independent of any game session.
    RoomId,
    "R"
);

id_type!(
    /// A unique identifier for a persisted game session.
    SessionId,
    "S"
);

id_type!(
    /// A unique identifier for a campaign that sessions belong to.
    CampaignId,
    "C"
);

id_type!(
    /// A unique identifier for a combatant inside an encounter.
    ///
    /// Participants are not necessarily players: NPCs and monsters get
    /// their own ids.
    ParticipantId,
    "X"
);

// ---------------------------------------------------------------------------
// Envelope — the top-level wire format
// ---------------------------------------------------------------------------

/// The top-level message wrapper. Every event on the wire is an Envelope.
///
/// ```text
/// ┌─────────────────────────────────┐
/// │ seq: 42                         │  ← message ordering
/// │ timestamp: 15000                │  ← when it was sent
/// │ ┌─────────────────────────────┐ │
/// │ │ payload: RoomEvent { .. }   │ │  ← the actual content
/// │ └─────────────────────────────┘ │
/// └─────────────────────────────────┘
/// ```
///
/// The payload type is generic so each layer can carry its own event
/// enum (`RoomEvent` for the connection layer, `SessionEvent` for the
/// session directory) without the protocol crate knowing about them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Auto-incrementing sequence number, maintained by the sender.
    pub seq: u64,

    /// Milliseconds since the Unix epoch on the sender's clock.
    /// Informational only: conflicts are resolved last-writer-wins by
    /// arrival order, never by this timestamp.
    pub timestamp: u64,

    /// The actual message content.
    pub payload: T,
}

impl<T> Envelope<T> {
    /// Wraps a payload with the given sequence number and the current time.
    pub fn new(seq: u64, payload: T) -> Self {
        Self {
            seq,
            timestamp: now_millis(),
            payload,
        }
    }
}

/// Milliseconds since the Unix epoch.
///
/// A clock before 1970 yields 0 rather than an error: timestamps are
/// informational and must never abort a state transition.
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The client SDK parses these shapes directly, so the serde
    //! attributes are part of the contract.

    use super::*;

    #[test]
    fn test_player_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&PlayerId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_session_id_deserializes_from_plain_number() {
        let sid: SessionId = serde_json::from_str("42").unwrap();
        assert_eq!(sid, SessionId(42));
    }

    #[test]
    fn test_id_display_uses_prefix() {
        assert_eq!(PlayerId(7).to_string(), "P-7");
        assert_eq!(RoomId(3).to_string(), "R-3");
        assert_eq!(SessionId(9).to_string(), "S-9");
        assert_eq!(CampaignId(1).to_string(), "C-1");
        assert_eq!(ParticipantId(12).to_string(), "X-12");
    }

    #[test]
    fn test_id_ordering_follows_inner_value() {
        assert!(ParticipantId(1) < ParticipantId(2));
    }

    #[test]
    fn test_envelope_json_shape() {
        let envelope = Envelope {
            seq: 3,
            timestamp: 100,
            payload: serde_json::json!({ "type": "Disconnected" }),
        };
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["seq"], 3);
        assert_eq!(json["timestamp"], 100);
        assert_eq!(json["payload"]["type"], "Disconnected");
    }

    #[test]
    fn test_envelope_new_stamps_current_time() {
        let envelope = Envelope::new(1, ());
        assert_eq!(envelope.seq, 1);
        assert!(envelope.timestamp > 0);
    }

    #[test]
    fn test_decode_envelope_missing_fields_returns_error() {
        let wrong = r#"{"name": "hello"}"#;
        let result: Result<Envelope<serde_json::Value>, _> =
            serde_json::from_str(wrong);
        assert!(result.is_err());
    }
}
