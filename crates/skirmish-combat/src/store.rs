//! The combat session store and its turn scheduler.
//!
//! One [`CombatStore`] holds one encounter: the participant registry, the
//! initiative order, the turn cursor and the action log. It is a plain
//! synchronous state container; the owner decides where it lives and how
//! access is serialized.
//!
//! # Turn order
//!
//! ```text
//! start_combat ──→ round 1, turn 0, current = order[0]
//!                       │
//!   next_turn ──→ order[i] → order[i+1] ... order[last] → order[0], round += 1
//!                       │
//!   end_combat ──→ zero-value store (config kept)
//! ```
//!
//! Initiative is 1d20 + modifier from an injected [`Roller`]. The order
//! is sorted descending by the roll, ties broken by the higher modifier
//! and then by the order participants were registered in.

use std::collections::HashMap;

use skirmish_protocol::{OpTracker, ParticipantId, SessionId};
use tracing::{debug, info, warn};

use crate::action::{ActionRecord, CombatAction};
use crate::config::CombatConfig;
use crate::dice::Roller;
use crate::error::{CombatError, CombatOp};
use crate::participant::CombatParticipant;
use crate::patch::{CombatPatch, Transition, TurnCursor};

/// State of one combat encounter.
#[derive(Debug, Clone)]
pub struct CombatStore {
    pub(crate) config: CombatConfig,
    pub(crate) active: bool,
    pub(crate) session_id: Option<SessionId>,
    pub(crate) round: u32,
    pub(crate) turn: u32,

    /// Registration order. Doubles as the final initiative tie-break.
    pub(crate) roster: Vec<ParticipantId>,
    pub(crate) participants: HashMap<ParticipantId, CombatParticipant>,
    pub(crate) initiative_order: Vec<ParticipantId>,
    pub(crate) current: Option<ParticipantId>,

    pub(crate) history: Vec<ActionRecord>,
    pub(crate) next_record_id: u64,
    pub(crate) pending_action: Option<CombatAction>,

    pub(crate) status: OpTracker<CombatOp>,
}

impl Default for CombatStore {
    fn default() -> Self {
        Self::new(CombatConfig::default())
    }
}

impl CombatStore {
    /// An inactive store with no participants.
    pub fn new(config: CombatConfig) -> Self {
        Self {
            config: config.validated(),
            active: false,
            session_id: None,
            round: 0,
            turn: 0,
            roster: Vec::new(),
            participants: HashMap::new(),
            initiative_order: Vec::new(),
            current: None,
            history: Vec::new(),
            next_record_id: 1,
            pending_action: None,
            status: OpTracker::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Starts an encounter for `session_id`.
    ///
    /// Anything the store held before is discarded. Every participant gets
    /// a fresh initiative roll, a clean turn and normalized hit points.
    /// Participants entering with no speed get `config.default_movement`.
    ///
    /// Fails with [`CombatError::DuplicateParticipant`] if two participants
    /// share an id; the store is left untouched in that case.
    pub fn start_combat<R: Roller + ?Sized>(
        &mut self,
        session_id: SessionId,
        participants: Vec<CombatParticipant>,
        roller: &mut R,
    ) -> Result<Transition, CombatError> {
        let mut seen = Vec::with_capacity(participants.len());
        for p in &participants {
            if seen.contains(&p.id) {
                return self.reject(CombatOp::Roster, CombatError::DuplicateParticipant(p.id));
            }
            seen.push(p.id);
        }

        if self.active {
            debug!(session = %session_id, "restarting combat over an active encounter");
        }

        let before = CombatPatch::snapshot(self);
        self.reset();

        for mut p in participants {
            self.prepare(&mut p);
            p.initiative = roller.roll_d20(p.initiative_modifier);
            self.roster.push(p.id);
            self.participants.insert(p.id, p);
        }
        self.sort_initiative();

        self.active = true;
        self.session_id = Some(session_id);
        self.round = 1;
        self.turn = 0;
        self.current = self.initiative_order.first().copied();

        info!(
            session = %session_id,
            participants = self.initiative_order.len(),
            "combat started"
        );

        Ok(Transition {
            before,
            after: CombatPatch::snapshot(self),
        })
    }

    /// Ends the encounter and resets the store to its zero value.
    pub fn end_combat(&mut self) -> Transition {
        let before = CombatPatch::snapshot(self);
        if let Some(session) = self.session_id {
            info!(session = %session, rounds = self.round, "combat ended");
        }
        self.reset();
        Transition {
            before,
            after: CombatPatch::snapshot(self),
        }
    }

    // -----------------------------------------------------------------------
    // Roster
    // -----------------------------------------------------------------------

    /// Registers a participant and re-sorts the initiative order.
    ///
    /// During active combat the newcomer rolls initiative and, if nobody
    /// holds the turn, takes it. Before combat the participant keeps the
    /// initiative it was given; `start_combat` rolls for everyone.
    pub fn add_participant<R: Roller + ?Sized>(
        &mut self,
        mut participant: CombatParticipant,
        roller: &mut R,
    ) -> Result<Transition, CombatError> {
        let id = participant.id;
        if self.participants.contains_key(&id) {
            return self.reject(CombatOp::Roster, CombatError::DuplicateParticipant(id));
        }

        let before = CombatPatch::capture(self, &[]).with_roster(self);

        self.prepare(&mut participant);
        if self.active {
            participant.initiative = roller.roll_d20(participant.initiative_modifier);
        }
        debug!(participant = %id, initiative = participant.initiative, "participant added");

        self.roster.push(id);
        self.participants.insert(id, participant);
        self.sort_initiative();

        if self.active && self.current.is_none() {
            self.current = self.initiative_order.first().copied();
        }
        self.status.succeed(CombatOp::Roster);

        Ok(Transition {
            before,
            after: CombatPatch::capture(self, &[id]).with_roster(self),
        })
    }

    /// Removes a participant.
    ///
    /// If it held the turn, the turn passes to whoever now occupies its
    /// slot in the initiative order (the first participant if it was
    /// last). Round and turn counters do not move.
    pub fn remove_participant(&mut self, id: ParticipantId) -> Result<Transition, CombatError> {
        if !self.participants.contains_key(&id) {
            return self.reject(CombatOp::Roster, CombatError::UnknownParticipant(id));
        }

        let before = CombatPatch::capture(self, &[id]).with_roster(self);

        let slot = self.initiative_order.iter().position(|p| *p == id);
        self.roster.retain(|p| *p != id);
        self.initiative_order.retain(|p| *p != id);
        self.participants.remove(&id);

        if self.current == Some(id) {
            self.current = slot
                .and_then(|i| self.initiative_order.get(i))
                .or_else(|| self.initiative_order.first())
                .copied();
            debug!(removed = %id, current = ?self.current, "turn handed over");
        }
        self.status.succeed(CombatOp::Roster);

        Ok(Transition {
            before,
            after: CombatPatch::capture(self, &[]).with_roster(self),
        })
    }

    /// Gives the turn to `id` without touching counters or flags.
    pub fn set_current_participant(
        &mut self,
        id: ParticipantId,
    ) -> Result<Transition, CombatError> {
        if !self.initiative_order.contains(&id) {
            return self.reject(CombatOp::Roster, CombatError::UnknownParticipant(id));
        }
        let before = CombatPatch::capture(self, &[]);
        self.current = Some(id);
        self.status.succeed(CombatOp::Roster);
        Ok(Transition {
            before,
            after: CombatPatch::capture(self, &[]),
        })
    }

    // -----------------------------------------------------------------------
    // Turns
    // -----------------------------------------------------------------------

    /// Advances to the next participant in initiative order.
    ///
    /// The outgoing participant's per-turn flags and movement are reset.
    /// Wrapping past the end starts a new round. Returns `None` (and does
    /// nothing) when combat is inactive or nobody is in the order.
    pub fn next_turn(&mut self) -> Option<Transition> {
        if !self.active || self.initiative_order.is_empty() {
            return None;
        }

        let outgoing: Vec<ParticipantId> = self.current.into_iter().collect();
        let before = CombatPatch::capture(self, &outgoing);

        if let Some(p) = self.current.and_then(|id| self.participants.get_mut(&id)) {
            p.reset_turn();
        }

        let position = self
            .current
            .and_then(|id| self.initiative_order.iter().position(|p| *p == id));
        let next = match position {
            Some(i) if i + 1 < self.initiative_order.len() => i + 1,
            Some(_) => {
                self.round += 1;
                0
            }
            None => 0,
        };

        self.current = self.initiative_order.get(next).copied();
        self.turn += 1;
        self.pending_action = None;

        debug!(
            round = self.round,
            turn = self.turn,
            current = ?self.current,
            "turn advanced"
        );

        Some(Transition {
            before,
            after: CombatPatch::capture(self, &outgoing),
        })
    }

    // -----------------------------------------------------------------------
    // Restore
    // -----------------------------------------------------------------------

    /// Merges a partial snapshot into the store.
    ///
    /// Sections the patch leaves as `None` are not touched. The roster is
    /// applied first: participants outside the restored roster are dropped,
    /// and patch participants outside it are ignored.
    pub fn restore_state(&mut self, patch: &CombatPatch) {
        if let Some(lifecycle) = &patch.lifecycle {
            self.active = lifecycle.active;
            self.session_id = lifecycle.session_id;
        }

        if let Some(roster) = &patch.roster {
            self.roster = roster.roster.clone();
            self.initiative_order = roster.initiative_order.clone();
            let kept = &self.roster;
            self.participants.retain(|id, _| kept.contains(id));
        }

        for p in &patch.participants {
            if !self.roster.contains(&p.id) {
                warn!(participant = %p.id, "restore skipped participant outside the roster");
                continue;
            }
            let mut p = p.clone();
            p.normalize();
            self.participants.insert(p.id, p);
        }

        if let Some(cursor) = &patch.cursor {
            self.round = cursor.round;
            self.turn = cursor.turn;
            self.current = cursor.current;
            self.pending_action = cursor.pending_action.clone();
        }

        if let Some(history) = &patch.history {
            self.history = history.clone();
            self.next_record_id = history.last().map_or(1, |r| r.id + 1);
        }

        debug!(round = self.round, turn = self.turn, "combat state restored");
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session_id
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Participant ids in registration order.
    pub fn roster(&self) -> &[ParticipantId] {
        &self.roster
    }

    /// Participant ids sorted by initiative, first to act first.
    pub fn initiative_order(&self) -> &[ParticipantId] {
        &self.initiative_order
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&CombatParticipant> {
        self.participants.get(&id)
    }

    pub fn participants_in_order(&self) -> Vec<&CombatParticipant> {
        self.initiative_order
            .iter()
            .filter_map(|id| self.participants.get(id))
            .collect()
    }

    pub fn current_participant_id(&self) -> Option<ParticipantId> {
        self.current
    }

    pub fn current_participant(&self) -> Option<&CombatParticipant> {
        self.current.and_then(|id| self.participants.get(&id))
    }

    /// The action log, oldest first.
    pub fn history(&self) -> &[ActionRecord] {
        &self.history
    }

    /// The last action taken this turn, cleared by `next_turn`.
    pub fn pending_action(&self) -> Option<&CombatAction> {
        self.pending_action.as_ref()
    }

    /// The last validation error recorded for `key`.
    pub fn error(&self, key: CombatOp) -> Option<&str> {
        self.status.error(key)
    }

    pub fn is_loading(&self, key: CombatOp) -> bool {
        self.status.is_loading(key)
    }

    pub(crate) fn cursor(&self) -> TurnCursor {
        TurnCursor {
            round: self.round,
            turn: self.turn,
            current: self.current,
            pending_action: self.pending_action.clone(),
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Records `error` under `key` and hands it back.
    pub(crate) fn reject<T>(&mut self, key: CombatOp, error: CombatError) -> Result<T, CombatError> {
        warn!(op = %key, %error, "combat operation rejected");
        self.status.record_error(key, error.to_string());
        Err(error)
    }

    fn prepare(&self, participant: &mut CombatParticipant) {
        if participant.movement_max == 0 {
            participant.movement_max = self.config.default_movement;
        }
        participant.reset_turn();
        participant.normalize();
    }

    fn sort_initiative(&mut self) {
        let mut keyed: Vec<(i32, i32, ParticipantId)> = self
            .roster
            .iter()
            .filter_map(|id| self.participants.get(id))
            .map(|p| (p.initiative, p.initiative_modifier, p.id))
            .collect();
        // Stable: equal keys keep registration order.
        keyed.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));
        self.initiative_order = keyed.into_iter().map(|(_, _, id)| id).collect();
    }

    fn reset(&mut self) {
        let config = self.config.clone();
        *self = Self::new(config);
    }
}
