//! The persistence backend, as seen from the directory.
//!
//! Skirmish doesn't store sessions itself. Whatever does (a REST service,
//! a database, an in-memory map in tests) implements [`SessionApi`] and
//! the [`SessionDirectory`](crate::SessionDirectory) calls it.
//!
//! Every call returns the full entity as the backend now sees it. The
//! directory replaces its local copy with that entity; it never patches
//! its replica from the request it sent.

use std::fmt;
use std::future::Future;

use skirmish_protocol::{PlayerId, SessionId};

use crate::{GameSession, SessionDraft, SessionUpdate};

/// Request/response access to persisted game sessions.
///
/// # Trait bounds
///
/// - `Send + Sync + 'static` → one API value is shared by every request
///   the directory has in flight.
/// - `Error: Display` → failures are stored as messages, never as values.
///
/// # Example
///
/// ```rust
/// use skirmish_protocol::{PlayerId, SessionId};
/// use skirmish_session::{GameSession, SessionApi, SessionDraft, SessionUpdate};
///
/// /// A backend that is always down.
/// struct Offline;
///
/// impl SessionApi for Offline {
///     type Error = String;
///
///     async fn get_sessions(&self) -> Result<Vec<GameSession>, String> {
///         Err("offline".into())
///     }
///     async fn create_session(&self, _: SessionDraft) -> Result<GameSession, String> {
///         Err("offline".into())
///     }
///     async fn join_session(&self, _: SessionId, _: PlayerId) -> Result<GameSession, String> {
///         Err("offline".into())
///     }
///     async fn leave_session(&self, _: SessionId, _: PlayerId) -> Result<GameSession, String> {
///         Err("offline".into())
///     }
///     async fn update_session(&self, _: SessionId, _: SessionUpdate) -> Result<GameSession, String> {
///         Err("offline".into())
///     }
/// }
/// ```
pub trait SessionApi: Send + Sync + 'static {
    /// Why a call failed. Only its `Display` text is kept.
    type Error: fmt::Display + Send;

    /// Every session visible to this client.
    fn get_sessions(
        &self,
    ) -> impl Future<Output = Result<Vec<GameSession>, Self::Error>> + Send;

    /// Opens a new session with the drafting DM in it.
    fn create_session(
        &self,
        draft: SessionDraft,
    ) -> impl Future<Output = Result<GameSession, Self::Error>> + Send;

    /// Seats `player` in `session`.
    fn join_session(
        &self,
        session: SessionId,
        player: PlayerId,
    ) -> impl Future<Output = Result<GameSession, Self::Error>> + Send;

    /// Removes `player` from `session`.
    fn leave_session(
        &self,
        session: SessionId,
        player: PlayerId,
    ) -> impl Future<Output = Result<GameSession, Self::Error>> + Send;

    /// Applies a partial update.
    fn update_session(
        &self,
        session: SessionId,
        update: SessionUpdate,
    ) -> impl Future<Output = Result<GameSession, Self::Error>> + Send;
}
