//! Turn-based combat for Skirmish.
//!
//! A [`CombatStore`] owns one encounter: who is fighting, in what order,
//! whose turn it is and what has happened so far. Actions and hit point
//! changes go through the store's executor methods, which validate,
//! mutate and log in one step.
//!
//! # Key types
//!
//! - [`CombatStore`] — encounter state and turn scheduler
//! - [`CombatParticipant`] — one combatant and its per-turn resources
//! - [`CombatAction`] / [`ActionRecord`] — requests and the action log
//! - [`CombatPatch`] / [`Transition`] — partial snapshots for undo and redo
//! - [`Roller`] — injected initiative dice
//!
//! Every mutation returns a [`Transition`]. Callers that keep an undo
//! history register `before` as the inverse and `after` as the forward
//! state; callers that don't can ignore it.

mod action;
mod config;
mod dice;
mod error;
mod executor;
mod participant;
mod patch;
mod store;

pub use action::{ActionKind, ActionRecord, CombatAction, DamageType};
pub use config::{CombatConfig, MovementPolicy};
pub use dice::{RandomRoller, Roller, SeededRoller};
pub use error::{CombatError, CombatOp};
pub use participant::{Category, CombatParticipant, Condition, DEFAULT_MOVEMENT};
pub use patch::{CombatPatch, Lifecycle, RosterPatch, Transition, TurnCursor};
pub use store::CombatStore;
