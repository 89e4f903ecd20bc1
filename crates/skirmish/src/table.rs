//! The table: one client's consolidated view of a game.
//!
//! A [`Table`] ties the layers together the way a client uses them:
//!
//! ```text
//!             ┌──────────── Table ────────────┐
//! actions ──→ │ CombatStore ──Transition──→ Ledger<TableOp>
//!             │      │                        │
//!             │      └─ start/end ─→ SessionDirectory ──→ SessionApi
//!             │                               │
//! transport → │ RoomFeed ──→ ConnectionManager │
//!             └───────────────────────────────┘
//! ```
//!
//! Every combat mutation made through the table is registered with the
//! ledger, so it can be undone. Whether combat is running is owned by the
//! combat store; the table copies it into the session's `combat_active`
//! whenever it changes, including through undo and redo.

use std::sync::Arc;

use skirmish_combat::{
    CombatAction, CombatParticipant, CombatStore, Condition, DamageType, RandomRoller, Roller,
    Transition,
};
use skirmish_ledger::{Ledger, UndoableAction};
use skirmish_protocol::{Codec, ParticipantId, PlayerId, SessionId};
use skirmish_room::{ConnectionManager, RoomFeed};
use skirmish_session::{GameSession, SessionApi, SessionDirectory, SessionDraft, SessionUpdate};
use skirmish_transport::Connection;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::op::{NotesEdit, TableOp, TableState};
use crate::{SkirmishError, TableConfig};

/// A client's live table: combat, undo history, sessions and rooms.
pub struct Table<A> {
    config: TableConfig,
    state: TableState,
    ledger: Ledger<TableOp>,
    roller: Box<dyn Roller + Send>,
    rooms: Arc<Mutex<ConnectionManager>>,
    directory: SessionDirectory<A>,
}

impl<A: SessionApi> Table<A> {
    /// Creates a table backed by `api`, rolling initiative with the
    /// thread-local RNG.
    pub fn new(api: A, config: TableConfig) -> Self {
        let config = config.validated();
        Self {
            state: TableState {
                combat: CombatStore::new(config.combat.clone()),
                notes: String::new(),
            },
            ledger: Ledger::new(config.ledger.clone()),
            roller: Box::new(RandomRoller),
            rooms: Arc::new(Mutex::new(ConnectionManager::new())),
            directory: SessionDirectory::new(api, config.directory.clone()),
            config,
        }
    }

    /// Replaces the initiative dice.
    pub fn with_roller(mut self, roller: impl Roller + Send + 'static) -> Self {
        self.roller = Box::new(roller);
        self
    }

    // -----------------------------------------------------------------------
    // Sessions
    // -----------------------------------------------------------------------

    /// The session directory, for fetches, updates and broadcasts.
    pub fn directory(&self) -> &SessionDirectory<A> {
        &self.directory
    }

    /// Opens a session and sits down at it.
    pub async fn create_session(&mut self, draft: SessionDraft) -> Result<GameSession, SkirmishError> {
        let session = self.directory.create_session(draft).await?;
        self.sit_down(&session);
        Ok(session)
    }

    /// Joins a session and sits down at it.
    pub async fn join_session(
        &mut self,
        session: SessionId,
        player: PlayerId,
    ) -> Result<GameSession, SkirmishError> {
        let joined = self.directory.join_session(session, player).await?;
        self.sit_down(&joined);
        Ok(joined)
    }

    /// Leaves a session.
    ///
    /// Local state tied to it (combat, undo history, notes draft) is torn
    /// down before the request goes out and stays torn down even if the
    /// backend refuses.
    pub async fn leave_session(
        &mut self,
        session: SessionId,
        player: PlayerId,
    ) -> Result<GameSession, SkirmishError> {
        if self.state.combat.session_id() == Some(session) {
            self.state.combat.end_combat();
        }
        self.ledger.clear_history();
        self.state.notes.clear();
        info!(%session, %player, "left table");

        Ok(self.directory.leave_session(session, player).await?)
    }

    fn sit_down(&mut self, session: &GameSession) {
        self.ledger.clear_history();
        self.state.notes.clone_from(&session.session_notes);
        debug!(session = %session.id, "sat down at table");
    }

    // -----------------------------------------------------------------------
    // Combat lifecycle
    // -----------------------------------------------------------------------

    /// Starts combat in the current session.
    pub async fn start_combat(
        &mut self,
        participants: Vec<CombatParticipant>,
    ) -> Result<(), SkirmishError> {
        let session = self
            .directory
            .current_session_id()
            .await
            .ok_or(SkirmishError::NoCurrentSession)?;

        let previous = self.combat_marker();
        let transition = self
            .state
            .combat
            .start_combat(session, participants, &mut *self.roller)?;
        self.record("start_combat", "Start combat".to_string(), transition);
        self.mirror_combat(previous).await;
        Ok(())
    }

    /// Ends the running combat.
    pub async fn end_combat(&mut self) -> Result<(), SkirmishError> {
        if !self.state.combat.is_active() {
            return Err(skirmish_combat::CombatError::NotActive.into());
        }
        let previous = self.combat_marker();
        let transition = self.state.combat.end_combat();
        self.record("end_combat", "End combat".to_string(), transition);
        self.mirror_combat(previous).await;
        Ok(())
    }

    /// Whether combat is running. Derived from the combat store, which
    /// the session's `combat_active` flag mirrors.
    pub fn combat_active(&self) -> bool {
        self.state.combat.is_active()
    }

    // -----------------------------------------------------------------------
    // Combat operations (undoable)
    // -----------------------------------------------------------------------

    pub fn execute_combat_action(&mut self, action: CombatAction) -> Result<(), SkirmishError> {
        let description = format!("{}: {}", self.name_of(action.actor_id), action.kind);
        let transition = self.state.combat.execute_combat_action(action)?;
        self.record("action", description, transition);
        Ok(())
    }

    pub fn apply_damage(
        &mut self,
        target: ParticipantId,
        amount: u32,
        damage_type: DamageType,
    ) -> Result<(), SkirmishError> {
        let transition = self.state.combat.apply_damage(target, amount, damage_type)?;
        let description = format!("{} takes {amount} damage", self.name_of(target));
        self.record("damage", description, transition);
        Ok(())
    }

    pub fn apply_healing(&mut self, target: ParticipantId, amount: u32) -> Result<(), SkirmishError> {
        let transition = self.state.combat.apply_healing(target, amount)?;
        let description = format!("{} heals {amount}", self.name_of(target));
        self.record("healing", description, transition);
        Ok(())
    }

    pub fn set_temporary_hit_points(
        &mut self,
        target: ParticipantId,
        amount: u32,
    ) -> Result<(), SkirmishError> {
        let transition = self.state.combat.set_temporary_hit_points(target, amount)?;
        let description = format!("{} gains {amount} temporary hit points", self.name_of(target));
        self.record("temporary_hit_points", description, transition);
        Ok(())
    }

    pub fn add_condition(
        &mut self,
        target: ParticipantId,
        condition: Condition,
    ) -> Result<(), SkirmishError> {
        let description = format!("{} is {condition}", self.name_of(target));
        let transition = self.state.combat.add_condition(target, condition)?;
        self.record("condition", description, transition);
        Ok(())
    }

    pub fn remove_condition(
        &mut self,
        target: ParticipantId,
        condition: &Condition,
    ) -> Result<(), SkirmishError> {
        let transition = self.state.combat.remove_condition(target, condition)?;
        let description = format!("{} is no longer {condition}", self.name_of(target));
        self.record("condition", description, transition);
        Ok(())
    }

    pub fn add_participant(&mut self, participant: CombatParticipant) -> Result<(), SkirmishError> {
        let description = format!("{} joins the fight", participant.name);
        let transition = self
            .state
            .combat
            .add_participant(participant, &mut *self.roller)?;
        self.record("roster", description, transition);
        Ok(())
    }

    pub fn remove_participant(&mut self, id: ParticipantId) -> Result<(), SkirmishError> {
        let description = format!("{} leaves the fight", self.name_of(id));
        let transition = self.state.combat.remove_participant(id)?;
        self.record("roster", description, transition);
        Ok(())
    }

    pub fn set_current_participant(&mut self, id: ParticipantId) -> Result<(), SkirmishError> {
        let transition = self.state.combat.set_current_participant(id)?;
        let description = format!("Turn to {}", self.name_of(id));
        self.record("turn", description, transition);
        Ok(())
    }

    /// Advances the turn. Returns `false` when there was nothing to advance.
    pub fn next_turn(&mut self) -> bool {
        match self.state.combat.next_turn() {
            Some(transition) => {
                self.record("turn", "Next turn".to_string(), transition);
                true
            }
            None => false,
        }
    }

    /// The combat store, for read-only views.
    pub fn combat(&self) -> &CombatStore {
        &self.state.combat
    }

    // -----------------------------------------------------------------------
    // Notes
    // -----------------------------------------------------------------------

    /// The local, unsaved notes draft for the current session.
    pub fn notes(&self) -> &str {
        &self.state.notes
    }

    /// Replaces the notes draft. Undoable.
    pub fn edit_notes(&mut self, text: impl Into<String>) {
        let next = text.into();
        if next == self.state.notes {
            return;
        }
        let edit = NotesEdit {
            previous: std::mem::replace(&mut self.state.notes, next.clone()),
            next,
        };
        self.ledger.add_undoable_action(UndoableAction::from_invertible(
            "notes",
            "Edit notes",
            TableOp::Notes(edit),
        ));
    }

    /// Writes the notes draft to the current session.
    pub async fn save_notes(&mut self) -> Result<GameSession, SkirmishError> {
        let session = self
            .directory
            .current_session_id()
            .await
            .ok_or(SkirmishError::NoCurrentSession)?;
        let update = SessionUpdate::notes(self.state.notes.clone());
        Ok(self.directory.update_session(session, update).await?)
    }

    // -----------------------------------------------------------------------
    // Undo / redo
    // -----------------------------------------------------------------------

    /// Reverts the newest undoable operation. Returns its description, or
    /// `None` when there was nothing to undo.
    pub async fn undo(&mut self) -> Option<String> {
        let previous = self.combat_marker();
        let description = self
            .ledger
            .undo(&mut self.state)
            .map(|a| a.description.clone())?;
        self.mirror_combat(previous).await;
        Some(description)
    }

    /// Re-applies the most recently undone operation.
    pub async fn redo(&mut self) -> Option<String> {
        let previous = self.combat_marker();
        let description = self
            .ledger
            .redo(&mut self.state)
            .map(|a| a.description.clone())?;
        self.mirror_combat(previous).await;
        Some(description)
    }

    pub fn can_undo(&self) -> bool {
        self.ledger.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.ledger.can_redo()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.ledger.undo_description()
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.ledger.redo_description()
    }

    // -----------------------------------------------------------------------
    // Rooms
    // -----------------------------------------------------------------------

    /// Shared handle to the connection manager.
    pub fn rooms(&self) -> Arc<Mutex<ConnectionManager>> {
        Arc::clone(&self.rooms)
    }

    /// A feed that applies room events from `conn` to this table's rooms.
    pub fn room_feed<C: Connection, K: Codec>(&self, conn: C, codec: K) -> RoomFeed<C, K> {
        RoomFeed::new(conn, codec, self.rooms())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn record(&mut self, kind: &str, description: String, transition: Transition) {
        self.ledger.add_undoable_action(UndoableAction::from_invertible(
            kind,
            description,
            TableOp::Combat(transition),
        ));
    }

    fn name_of(&self, id: ParticipantId) -> String {
        self.state
            .combat
            .participant(id)
            .map_or_else(|| id.to_string(), |p| p.name.clone())
    }

    /// The session combat is running for, if any.
    fn combat_marker(&self) -> Option<SessionId> {
        let combat = &self.state.combat;
        if combat.is_active() { combat.session_id() } else { None }
    }

    /// Copies a change in the combat marker into the directory.
    async fn mirror_combat(&self, previous: Option<SessionId>) {
        let now = self.combat_marker();
        if now == previous {
            return;
        }
        if let Some(session) = previous {
            self.set_combat_flag(session, false).await;
        }
        if let Some(session) = now {
            self.set_combat_flag(session, true).await;
        }
    }

    async fn set_combat_flag(&self, session: SessionId, active: bool) {
        let known = if active {
            self.directory.combat_started(session).await
        } else {
            self.directory.combat_ended(session).await
        };
        if !known {
            debug!(%session, "combat flag for a session not in the directory");
        }

        if self.config.persist_combat_flag {
            let update = SessionUpdate::combat_active(active);
            if let Err(e) = self.directory.update_session(session, update).await {
                warn!(%session, error = %e, "combat flag not persisted");
            }
        }
    }
}
