//! Undo/redo history for Skirmish.
//!
//! The ledger knows nothing about combat. It stores pairs of serializable
//! operation descriptors (forward and inverse) and replays them against
//! any target that implements [`Apply`] for that descriptor type.
//!
//! ```text
//! add ──→ [undo stack] ──undo──→ [redo stack]
//!              ↑                      │
//!              └────────redo──────────┘
//! ```
//!
//! Registering a new action clears the redo stack. Both stacks are bounded
//! by [`LedgerConfig::capacity`]; the oldest entry goes first.

mod action;
mod ledger;

pub use action::{Apply, Invertible, UndoableAction};
pub use ledger::{Ledger, LedgerConfig};
