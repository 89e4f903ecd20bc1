//! Undoable entries and the traits that replay them.

use serde::{Deserialize, Serialize};
use skirmish_protocol::now_millis;

/// Something an operation descriptor can be applied to.
///
/// Implemented by whatever owns the state the descriptors describe
/// (a combat table, a notes editor...). Application is infallible: a
/// descriptor that no longer fits its target should be ignored by the
/// implementation, not reported.
pub trait Apply<Op> {
    fn apply(&mut self, op: &Op);
}

/// Descriptors that can compute their own inverse.
pub trait Invertible {
    fn inverse(&self) -> Self;
}

/// One entry in the undo or redo stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndoableAction<Op> {
    /// Assigned by the ledger when the entry is registered.
    pub id: u64,
    /// Short type tag, e.g. `"damage"`.
    pub kind: String,
    /// Unix milliseconds at creation.
    pub timestamp: u64,
    /// Shown next to the undo/redo buttons.
    pub description: String,
    /// Applied by redo.
    pub forward: Op,
    /// Applied by undo.
    pub inverse: Op,
}

impl<Op> UndoableAction<Op> {
    pub fn new(
        kind: impl Into<String>,
        description: impl Into<String>,
        forward: Op,
        inverse: Op,
    ) -> Self {
        Self {
            id: 0,
            kind: kind.into(),
            timestamp: now_millis(),
            description: description.into(),
            forward,
            inverse,
        }
    }
}

impl<Op: Invertible> UndoableAction<Op> {
    /// Builds an entry whose inverse is derived from `forward`.
    pub fn from_invertible(
        kind: impl Into<String>,
        description: impl Into<String>,
        forward: Op,
    ) -> Self {
        let inverse = forward.inverse();
        Self::new(kind, description, forward, inverse)
    }
}
