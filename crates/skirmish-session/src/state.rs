//! Directory state and its reducers.
//!
//! Every async operation runs in three phases, each a plain method here:
//!
//! ```text
//! pending(op) ──→ [loading] ──→ *_fulfilled(entity) → entity upserted
//!                      │
//!                      └──────→ rejected(op, msg)    → errors[op] = msg
//! ```
//!
//! Operations are tracked independently: a failed join never hides a
//! pending fetch. Entities are upserted whole (last writer wins) and
//! never removed; leaving a session only changes the membership the
//! backend reports.

use std::collections::HashMap;
use std::fmt;

use skirmish_protocol::{OpTracker, PlayerId, SessionId};
use tracing::{debug, info};

use crate::{DirectoryConfig, GameSession, SessionEvent};

/// Operation keys for the directory's loading/error maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionOp {
    Fetch,
    Create,
    Join,
    Leave,
    Update,
}

impl fmt::Display for SessionOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self {
            Self::Fetch => "fetch",
            Self::Create => "create",
            Self::Join => "join",
            Self::Leave => "leave",
            Self::Update => "update",
        };
        f.write_str(key)
    }
}

/// The local replica of game sessions.
#[derive(Debug, Clone)]
pub struct DirectoryState {
    config: DirectoryConfig,
    sessions: HashMap<SessionId, GameSession>,
    current: Option<SessionId>,
    status: OpTracker<SessionOp>,
}

impl Default for DirectoryState {
    fn default() -> Self {
        Self::new(DirectoryConfig::default())
    }
}

impl DirectoryState {
    pub fn new(config: DirectoryConfig) -> Self {
        Self {
            config: config.validated(),
            sessions: HashMap::new(),
            current: None,
            status: OpTracker::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Request phases
    // -----------------------------------------------------------------------

    /// A request for `op` went out.
    pub fn pending(&mut self, op: SessionOp) {
        self.status.begin(op);
    }

    /// A leave request for `session` went out.
    ///
    /// The client stops treating `session` as current right away, whatever
    /// the backend answers.
    pub fn leave_pending(&mut self, session: SessionId) {
        self.status.begin(SessionOp::Leave);
        if self.current == Some(session) {
            debug!(%session, "current session cleared on leave");
            self.current = None;
        }
    }

    pub fn fetch_fulfilled(&mut self, sessions: Vec<GameSession>) {
        debug!(count = sessions.len(), "sessions fetched");
        for session in sessions {
            self.upsert(session);
        }
        self.status.succeed(SessionOp::Fetch);
    }

    /// The new session becomes current: its creator is in it.
    pub fn create_fulfilled(&mut self, session: GameSession) {
        info!(session = %session.id, dm = %session.dm_id, "session created");
        self.current = Some(session.id);
        self.upsert(session);
        self.status.succeed(SessionOp::Create);
    }

    pub fn join_fulfilled(&mut self, session: GameSession) {
        info!(session = %session.id, "session joined");
        self.current = Some(session.id);
        self.upsert(session);
        self.status.succeed(SessionOp::Join);
    }

    pub fn leave_fulfilled(&mut self, session: GameSession) {
        info!(session = %session.id, "session left");
        self.upsert(session);
        self.status.succeed(SessionOp::Leave);
    }

    pub fn update_fulfilled(&mut self, session: GameSession) {
        self.upsert(session);
        self.status.succeed(SessionOp::Update);
    }

    /// The request for `op` failed.
    ///
    /// Entities and the current session are left as they are. Returns the
    /// message actually stored: a blank `message` becomes the configured
    /// generic error.
    pub fn rejected(&mut self, op: SessionOp, message: impl Into<String>) -> String {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = self.config.generic_error.clone();
        }
        tracing::warn!(%op, %message, "session request failed");
        self.status.fail(op, message.clone());
        message
    }

    // -----------------------------------------------------------------------
    // Broadcasts
    // -----------------------------------------------------------------------

    /// Replaces a known session with a newer copy. Unknown ids are dropped.
    pub fn session_updated(&mut self, session: GameSession) -> bool {
        match self.sessions.get_mut(&session.id) {
            Some(existing) => {
                *existing = session;
                true
            }
            None => {
                debug!(session = %session.id, "update for unknown session dropped");
                false
            }
        }
    }

    pub fn player_joined(&mut self, session: SessionId, player: PlayerId) -> bool {
        self.with_session(session, |s| {
            s.player_ids.insert(player);
        })
    }

    pub fn player_left(&mut self, session: SessionId, player: PlayerId) -> bool {
        self.with_session(session, |s| {
            s.player_ids.remove(&player);
        })
    }

    pub fn combat_started(&mut self, session: SessionId) -> bool {
        self.with_session(session, |s| s.combat_active = true)
    }

    pub fn combat_ended(&mut self, session: SessionId) -> bool {
        self.with_session(session, |s| s.combat_active = false)
    }

    /// Dispatches a backend broadcast to the matching reducer.
    ///
    /// Returns whether a known session changed.
    pub fn apply_event(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::SessionUpdated { session } => self.session_updated(session),
            SessionEvent::PlayerJoined {
                session_id,
                player_id,
            } => self.player_joined(session_id, player_id),
            SessionEvent::PlayerLeft {
                session_id,
                player_id,
            } => self.player_left(session_id, player_id),
            SessionEvent::CombatStarted { session_id } => self.combat_started(session_id),
            SessionEvent::CombatEnded { session_id } => self.combat_ended(session_id),
        }
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    pub fn session(&self, id: SessionId) -> Option<&GameSession> {
        self.sessions.get(&id)
    }

    /// All known sessions, ordered by id.
    pub fn sessions(&self) -> Vec<&GameSession> {
        let mut list: Vec<&GameSession> = self.sessions.values().collect();
        list.sort_by_key(|s| s.id);
        list
    }

    pub fn current_session_id(&self) -> Option<SessionId> {
        self.current
    }

    pub fn current_session(&self) -> Option<&GameSession> {
        self.current.and_then(|id| self.sessions.get(&id))
    }

    pub fn is_loading(&self, op: SessionOp) -> bool {
        self.status.is_loading(op)
    }

    pub fn any_loading(&self) -> bool {
        self.status.any_loading()
    }

    pub fn error(&self, op: SessionOp) -> Option<&str> {
        self.status.error(op)
    }

    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn upsert(&mut self, session: GameSession) {
        self.sessions.insert(session.id, session);
    }

    fn with_session(&mut self, id: SessionId, f: impl FnOnce(&mut GameSession)) -> bool {
        match self.sessions.get_mut(&id) {
            Some(session) => {
                f(session);
                true
            }
            None => {
                debug!(session = %id, "event for unknown session dropped");
                false
            }
        }
    }
}
