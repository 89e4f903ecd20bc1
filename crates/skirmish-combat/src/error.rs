//! Error types and operation keys for the combat layer.

use std::fmt;

use skirmish_protocol::ParticipantId;

/// Operation keys for the store's loading/error maps.
///
/// `Display` gives the lowercase key the presentation layer reads
/// (`errors["action"]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombatOp {
    Action,
    Damage,
    Healing,
    Condition,
    Roster,
}

impl fmt::Display for CombatOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self {
            Self::Action => "action",
            Self::Damage => "damage",
            Self::Healing => "healing",
            Self::Condition => "condition",
            Self::Roster => "roster",
        };
        f.write_str(key)
    }
}

/// Validation failures in the combat layer.
///
/// These are never fatal. The store records the message under the
/// matching [`CombatOp`] key and also returns the error so callers can
/// branch on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    /// No encounter is running. Actions attempted outside combat get
    /// this rather than [`CombatError::NotYourTurn`], so a closed
    /// encounter reads differently from a turn held by someone else.
    #[error("combat is not active")]
    NotActive,

    /// The actor is not the current participant.
    #[error("Not your turn: {actor} cannot act right now")]
    NotYourTurn {
        actor: ParticipantId,
        current: Option<ParticipantId>,
    },

    /// A `Move` asked for more feet than the actor has left.
    #[error("movement exceeds remaining: requested {requested} ft, {remaining} ft left")]
    MovementExceeded { requested: u32, remaining: u32 },

    /// No participant with this id is in the encounter.
    #[error("participant {0} not found")]
    UnknownParticipant(ParticipantId),

    /// A participant with this id is already in the encounter.
    #[error("participant {0} is already in combat")]
    DuplicateParticipant(ParticipantId),

    /// `Unconscious` follows hit points and can't be toggled by hand.
    #[error("unconscious on {0} follows hit points and cannot be set directly")]
    ConditionLocked(ParticipantId),
}
