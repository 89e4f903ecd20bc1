//! Undoable operations on a table.
//!
//! Ledger entries are data, not closures: each [`TableOp`] says what to
//! put back, so the history can be inspected, logged or shipped to
//! another client.

use serde::{Deserialize, Serialize};
use skirmish_combat::{CombatStore, Transition};
use skirmish_ledger::{Apply, Invertible};

/// A replace of the local notes draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesEdit {
    pub previous: String,
    pub next: String,
}

/// An operation the table's ledger can replay.
///
/// Applying a descriptor moves the target to the transition's `after`
/// side; the inverse swaps the sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data", rename_all = "snake_case")]
pub enum TableOp {
    Combat(Transition),
    Notes(NotesEdit),
}

impl Invertible for TableOp {
    fn inverse(&self) -> Self {
        match self {
            Self::Combat(transition) => Self::Combat(transition.reversed()),
            Self::Notes(edit) => Self::Notes(NotesEdit {
                previous: edit.next.clone(),
                next: edit.previous.clone(),
            }),
        }
    }
}

/// The part of a table the ledger replays against.
#[derive(Debug, Clone, Default)]
pub struct TableState {
    pub combat: CombatStore,
    pub notes: String,
}

impl Apply<TableOp> for TableState {
    fn apply(&mut self, op: &TableOp) {
        match op {
            TableOp::Combat(transition) => self.combat.restore_state(&transition.after),
            TableOp::Notes(edit) => self.notes.clone_from(&edit.next),
        }
    }
}
