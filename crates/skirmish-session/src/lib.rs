//! Game session directory for Skirmish.
//!
//! Keeps a local replica of the persisted game sessions this client can
//! see, and which one it is currently playing in:
//!
//! 1. **Collaborator** — the persistence backend is reached through the
//!    [`SessionApi`] trait; this crate never talks HTTP itself
//! 2. **Reducers** — [`DirectoryState`] applies each phase of a request
//!    (pending, fulfilled, rejected) and each broadcast [`SessionEvent`]
//! 3. **Async shell** — [`SessionDirectory`] drives requests against the
//!    API and feeds the results through the reducers
//!
//! # How it fits in the stack
//!
//! ```text
//! Table (above)      ← mirrors combat start/end into combat_active
//!     ↕
//! Session Directory (this crate)  ← sessions, membership, current session
//!     ↕
//! SessionApi (below) ← persistence backend, opaque request/response
//! ```
//!
//! Conflicts between clients resolve last-writer-wins: whatever entity
//! arrives last replaces the local copy.

#![allow(async_fn_in_trait)]

mod api;
mod directory;
mod error;
mod session;
mod state;

pub use api::SessionApi;
pub use directory::SessionDirectory;
pub use error::SessionError;
pub use session::{DirectoryConfig, GameSession, SessionDraft, SessionEvent, SessionUpdate};
pub use state::{DirectoryState, SessionOp};
