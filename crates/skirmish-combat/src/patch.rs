//! Partial combat state, for undo and redo.
//!
//! A [`CombatPatch`] names only the parts of the store it touches. Every
//! mutation captures a patch of the affected region before and after it
//! runs and hands both back as a [`Transition`]. Applying `before` with
//! [`CombatStore::restore_state`](crate::CombatStore::restore_state) undoes
//! the mutation; applying `after` redoes it.
//!
//! ```text
//! lifecycle    active, session id
//! cursor       round, turn, current participant, pending action
//! roster       registry order + initiative order
//! participants full entities, upserted by id
//! history      the whole action log
//! ```
//!
//! `None` sections are left alone when the patch is applied.

use serde::{Deserialize, Serialize};
use skirmish_protocol::{ParticipantId, SessionId};

use crate::action::{ActionRecord, CombatAction};
use crate::participant::CombatParticipant;
use crate::store::CombatStore;

/// Whether combat is running, and for which session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifecycle {
    pub active: bool,
    pub session_id: Option<SessionId>,
}

/// Where the encounter stands in the turn order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnCursor {
    pub round: u32,
    pub turn: u32,
    pub current: Option<ParticipantId>,
    pub pending_action: Option<CombatAction>,
}

/// Who is in the encounter and in what order they act.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterPatch {
    pub roster: Vec<ParticipantId>,
    pub initiative_order: Vec<ParticipantId>,
}

/// A partial snapshot of a [`CombatStore`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle: Option<Lifecycle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<TurnCursor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roster: Option<RosterPatch>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub participants: Vec<CombatParticipant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<ActionRecord>>,
}

impl CombatPatch {
    /// Captures the turn cursor and the listed participants.
    ///
    /// Ids the store doesn't know are skipped.
    pub fn capture(store: &CombatStore, ids: &[ParticipantId]) -> Self {
        Self {
            cursor: Some(store.cursor()),
            participants: ids
                .iter()
                .filter_map(|id| store.participant(*id).cloned())
                .collect(),
            ..Self::default()
        }
    }

    /// Adds the roster and initiative order to the capture.
    pub fn with_roster(mut self, store: &CombatStore) -> Self {
        self.roster = Some(RosterPatch {
            roster: store.roster().to_vec(),
            initiative_order: store.initiative_order().to_vec(),
        });
        self
    }

    /// Captures everything the store holds except its configuration and
    /// error bookkeeping.
    pub fn snapshot(store: &CombatStore) -> Self {
        Self {
            lifecycle: Some(Lifecycle {
                active: store.is_active(),
                session_id: store.session_id(),
            }),
            cursor: Some(store.cursor()),
            roster: Some(RosterPatch {
                roster: store.roster().to_vec(),
                initiative_order: store.initiative_order().to_vec(),
            }),
            participants: store.participants_in_order().into_iter().cloned().collect(),
            history: Some(store.history().to_vec()),
        }
    }
}

/// The store before and after one mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub before: CombatPatch,
    pub after: CombatPatch,
}

impl Transition {
    /// The same transition run backwards.
    pub fn reversed(&self) -> Self {
        Self {
            before: self.after.clone(),
            after: self.before.clone(),
        }
    }
}
