//! The bounded undo/redo stacks.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::action::{Apply, UndoableAction};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Settings for a [`Ledger`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Maximum entries per stack. Default: 50.
    pub capacity: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self { capacity: 50 }
    }
}

impl LedgerConfig {
    pub const MAX_CAPACITY: usize = 10_000;

    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Clamp values to valid ranges.
    pub fn validated(mut self) -> Self {
        if self.capacity == 0 {
            warn!("ledger capacity is zero, using 1");
            self.capacity = 1;
        }
        if self.capacity > Self::MAX_CAPACITY {
            warn!(
                capacity = self.capacity,
                max = Self::MAX_CAPACITY,
                "ledger capacity exceeds maximum, clamping"
            );
            self.capacity = Self::MAX_CAPACITY;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// Undo and redo stacks of [`UndoableAction`]s.
///
/// The newest entry sits at the back of each deque; eviction pops the
/// front.
#[derive(Debug, Clone)]
pub struct Ledger<Op> {
    config: LedgerConfig,
    undo: VecDeque<UndoableAction<Op>>,
    redo: VecDeque<UndoableAction<Op>>,
    next_id: u64,
}

impl<Op> Default for Ledger<Op> {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

impl<Op> Ledger<Op> {
    pub fn new(config: LedgerConfig) -> Self {
        let config = config.validated();
        Self {
            undo: VecDeque::with_capacity(config.capacity),
            redo: VecDeque::new(),
            config,
            next_id: 1,
        }
    }

    /// Registers a freshly performed action.
    ///
    /// Assigns its id, pushes it onto the undo stack, drops everything on
    /// the redo stack and evicts the oldest undo entry if over capacity.
    /// Returns the assigned id.
    pub fn add_undoable_action(&mut self, mut action: UndoableAction<Op>) -> u64 {
        action.id = self.next_id;
        self.next_id += 1;

        debug!(id = action.id, kind = %action.kind, "undoable action registered");

        self.undo.push_back(action);
        self.redo.clear();
        Self::trim(&mut self.undo, self.config.capacity);
        self.next_id - 1
    }

    /// Reverts the newest action by applying its inverse to `target`.
    ///
    /// The entry moves to the redo stack. Returns `None` without touching
    /// `target` when there is nothing to undo.
    pub fn undo<T: Apply<Op>>(&mut self, target: &mut T) -> Option<&UndoableAction<Op>> {
        let action = self.undo.pop_back()?;
        target.apply(&action.inverse);
        debug!(id = action.id, description = %action.description, "undo");

        self.redo.push_back(action);
        Self::trim(&mut self.redo, self.config.capacity);
        self.redo.back()
    }

    /// Re-applies the most recently undone action's forward operation.
    ///
    /// The entry moves back to the undo stack. Returns `None` without
    /// touching `target` when there is nothing to redo.
    pub fn redo<T: Apply<Op>>(&mut self, target: &mut T) -> Option<&UndoableAction<Op>> {
        let action = self.redo.pop_back()?;
        target.apply(&action.forward);
        debug!(id = action.id, description = %action.description, "redo");

        self.undo.push_back(action);
        Self::trim(&mut self.undo, self.config.capacity);
        self.undo.back()
    }

    /// Forgets both stacks.
    pub fn clear_history(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// What undo would revert.
    pub fn undo_description(&self) -> Option<&str> {
        self.undo.back().map(|a| a.description.as_str())
    }

    /// What redo would re-apply.
    pub fn redo_description(&self) -> Option<&str> {
        self.redo.back().map(|a| a.description.as_str())
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Undo entries, oldest first.
    pub fn undo_entries(&self) -> impl Iterator<Item = &UndoableAction<Op>> {
        self.undo.iter()
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    fn trim(stack: &mut VecDeque<UndoableAction<Op>>, capacity: usize) {
        while stack.len() > capacity {
            if let Some(evicted) = stack.pop_front() {
                debug!(id = evicted.id, "oldest history entry evicted");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validated_zero_capacity_becomes_one() {
        assert_eq!(LedgerConfig::with_capacity(0).validated().capacity, 1);
    }

    #[test]
    fn test_validated_caps_capacity() {
        let config = LedgerConfig::with_capacity(usize::MAX).validated();
        assert_eq!(config.capacity, LedgerConfig::MAX_CAPACITY);
    }

    #[test]
    fn test_add_assigns_sequential_ids() {
        let mut ledger: Ledger<u8> = Ledger::default();
        let a = ledger.add_undoable_action(UndoableAction::new("t", "a", 1, 0));
        let b = ledger.add_undoable_action(UndoableAction::new("t", "b", 2, 1));
        assert_eq!((a, b), (1, 2));
        assert_eq!(ledger.undo_description(), Some("b"));
    }
}
