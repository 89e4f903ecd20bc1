//! The async session directory.
//!
//! Wraps a [`DirectoryState`] and a [`SessionApi`]. Each operation locks
//! the state for its pending phase, releases it for the network call and
//! locks it again to merge the outcome. The lock is never held across an
//! await on the backend, so different operations overlap freely.
//!
//! There is no cancellation: a request that is superseded by a newer one
//! still merges when it resolves.

use skirmish_protocol::{PlayerId, SessionId};
use tokio::sync::Mutex;

use crate::{
    DirectoryConfig, DirectoryState, GameSession, SessionApi, SessionDraft, SessionError,
    SessionEvent, SessionOp, SessionUpdate,
};

/// Client-side directory of game sessions backed by a [`SessionApi`].
pub struct SessionDirectory<A> {
    api: A,
    state: Mutex<DirectoryState>,
}

impl<A: SessionApi> SessionDirectory<A> {
    pub fn new(api: A, config: DirectoryConfig) -> Self {
        Self {
            api,
            state: Mutex::new(DirectoryState::new(config)),
        }
    }

    /// The backend this directory talks to.
    pub fn api(&self) -> &A {
        &self.api
    }

    // -----------------------------------------------------------------------
    // Requests
    // -----------------------------------------------------------------------

    /// Loads every session visible to this client.
    pub async fn fetch_sessions(&self) -> Result<Vec<GameSession>, SessionError> {
        self.state.lock().await.pending(SessionOp::Fetch);
        match self.api.get_sessions().await {
            Ok(sessions) => {
                self.state.lock().await.fetch_fulfilled(sessions.clone());
                Ok(sessions)
            }
            Err(e) => Err(self.reject(SessionOp::Fetch, e).await),
        }
    }

    /// Opens a new session and makes it current.
    pub async fn create_session(&self, draft: SessionDraft) -> Result<GameSession, SessionError> {
        self.state.lock().await.pending(SessionOp::Create);
        match self.api.create_session(draft).await {
            Ok(session) => {
                self.state.lock().await.create_fulfilled(session.clone());
                Ok(session)
            }
            Err(e) => Err(self.reject(SessionOp::Create, e).await),
        }
    }

    /// Joins a session and makes it current.
    pub async fn join_session(
        &self,
        session: SessionId,
        player: PlayerId,
    ) -> Result<GameSession, SessionError> {
        self.state.lock().await.pending(SessionOp::Join);
        match self.api.join_session(session, player).await {
            Ok(joined) => {
                self.state.lock().await.join_fulfilled(joined.clone());
                Ok(joined)
            }
            Err(e) => Err(self.reject(SessionOp::Join, e).await),
        }
    }

    /// Leaves a session.
    ///
    /// The session stops being current as soon as the request goes out.
    /// If the backend refuses, the local copy still lists `player` as a
    /// member until a fresher copy arrives.
    pub async fn leave_session(
        &self,
        session: SessionId,
        player: PlayerId,
    ) -> Result<GameSession, SessionError> {
        self.state.lock().await.leave_pending(session);
        match self.api.leave_session(session, player).await {
            Ok(left) => {
                self.state.lock().await.leave_fulfilled(left.clone());
                Ok(left)
            }
            Err(e) => Err(self.reject(SessionOp::Leave, e).await),
        }
    }

    pub async fn update_session(
        &self,
        session: SessionId,
        update: SessionUpdate,
    ) -> Result<GameSession, SessionError> {
        self.state.lock().await.pending(SessionOp::Update);
        match self.api.update_session(session, update).await {
            Ok(updated) => {
                self.state.lock().await.update_fulfilled(updated.clone());
                Ok(updated)
            }
            Err(e) => Err(self.reject(SessionOp::Update, e).await),
        }
    }

    // -----------------------------------------------------------------------
    // Local reducers
    // -----------------------------------------------------------------------

    /// Applies a backend broadcast.
    pub async fn apply_event(&self, event: SessionEvent) -> bool {
        self.state.lock().await.apply_event(event)
    }

    /// Marks combat as running in the local copy of `session`.
    pub async fn combat_started(&self, session: SessionId) -> bool {
        self.state.lock().await.combat_started(session)
    }

    /// Marks combat as over in the local copy of `session`.
    pub async fn combat_ended(&self, session: SessionId) -> bool {
        self.state.lock().await.combat_ended(session)
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    /// Runs `f` against the current state under the lock.
    pub async fn read<R>(&self, f: impl FnOnce(&DirectoryState) -> R) -> R {
        f(&*self.state.lock().await)
    }

    pub async fn current_session_id(&self) -> Option<SessionId> {
        self.state.lock().await.current_session_id()
    }

    pub async fn session(&self, id: SessionId) -> Option<GameSession> {
        self.state.lock().await.session(id).cloned()
    }

    pub async fn is_loading(&self, op: SessionOp) -> bool {
        self.state.lock().await.is_loading(op)
    }

    pub async fn error(&self, op: SessionOp) -> Option<String> {
        self.state.lock().await.error(op).map(str::to_owned)
    }

    async fn reject(&self, op: SessionOp, error: A::Error) -> SessionError {
        let message = self.state.lock().await.rejected(op, error.to_string());
        SessionError::Rejected { op, message }
    }
}
