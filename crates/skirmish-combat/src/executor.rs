//! Action execution and hit point bookkeeping.
//!
//! Every operation here validates first and mutates second: a rejected
//! request leaves every participant exactly as it was and records the
//! failure under its [`CombatOp`] key.

use skirmish_protocol::{ParticipantId, now_millis};
use tracing::debug;

use crate::action::{ActionKind, ActionRecord, CombatAction, DamageType};
use crate::config::MovementPolicy;
use crate::error::{CombatError, CombatOp};
use crate::participant::{CombatParticipant, Condition};
use crate::patch::{CombatPatch, Transition};
use crate::store::CombatStore;

impl CombatStore {
    /// Performs `action` for the participant whose turn it is.
    ///
    /// The actor must be the current participant. On success the action
    /// becomes the pending action, its cost is charged to the actor's turn
    /// economy and a record is appended to the history.
    pub fn execute_combat_action(&mut self, action: CombatAction) -> Result<Transition, CombatError> {
        if !self.active {
            return self.reject(CombatOp::Action, CombatError::NotActive);
        }
        let actor = action.actor_id;
        if self.current != Some(actor) {
            return self.reject(
                CombatOp::Action,
                CombatError::NotYourTurn {
                    actor,
                    current: self.current,
                },
            );
        }
        let Some(remaining) = self.participants.get(&actor).map(CombatParticipant::movement_remaining)
        else {
            return self.reject(CombatOp::Action, CombatError::UnknownParticipant(actor));
        };
        if let ActionKind::Move { distance } = action.kind {
            if self.config.movement_policy == MovementPolicy::Reject && distance > remaining {
                return self.reject(
                    CombatOp::Action,
                    CombatError::MovementExceeded {
                        requested: distance,
                        remaining,
                    },
                );
            }
        }

        let before = CombatPatch::capture(self, &[actor]);
        self.pending_action = Some(action.clone());

        let policy = self.config.movement_policy;
        if let Some(p) = self.participants.get_mut(&actor) {
            match action.kind {
                ActionKind::Attack | ActionKind::CastSpell | ActionKind::Dodge => p.has_acted = true,
                ActionKind::BonusAction => p.has_bonus_acted = true,
                ActionKind::Reaction => p.has_reacted = true,
                ActionKind::Move { distance } => {
                    let spent = p.movement_used.saturating_add(distance);
                    p.movement_used = match policy {
                        MovementPolicy::Clamp => spent.min(p.movement_max),
                        MovementPolicy::Reject | MovementPolicy::Allow => spent,
                    };
                }
            }
        }

        debug!(actor = %actor, action = %action.kind, round = self.round, "action executed");

        let record = ActionRecord {
            id: self.next_record_id,
            round: self.round,
            turn: self.turn,
            action,
            timestamp: now_millis(),
        };
        self.next_record_id += 1;
        self.history.push(record);
        self.status.succeed(CombatOp::Action);

        Ok(Transition {
            before,
            after: CombatPatch::capture(self, &[actor]),
        })
    }

    /// Deals `amount` damage to `target`.
    ///
    /// Temporary hit points soak damage first. Whatever is left comes off
    /// current hit points, which stop at zero. Dropping to zero makes the
    /// target unconscious.
    pub fn apply_damage(
        &mut self,
        target: ParticipantId,
        amount: u32,
        damage_type: DamageType,
    ) -> Result<Transition, CombatError> {
        self.modify(CombatOp::Damage, target, |p| {
            let absorbed = p.temporary_hit_points.min(amount);
            p.temporary_hit_points -= absorbed;
            p.hit_points_current = p.hit_points_current.saturating_sub(amount - absorbed);
            if p.hit_points_current == 0 {
                p.conditions.insert(Condition::Unconscious);
            }
            debug!(
                target = %p.id,
                amount,
                ?damage_type,
                hp = p.hit_points_current,
                temp = p.temporary_hit_points,
                "damage applied"
            );
            Ok(())
        })
    }

    /// Restores up to `amount` hit points, never past the maximum.
    pub fn apply_healing(&mut self, target: ParticipantId, amount: u32) -> Result<Transition, CombatError> {
        self.modify(CombatOp::Healing, target, |p| {
            p.hit_points_current = p.hit_points_current.saturating_add(amount).min(p.hit_points_max);
            if p.hit_points_current > 0 {
                p.conditions.remove(&Condition::Unconscious);
            }
            debug!(target = %p.id, amount, hp = p.hit_points_current, "healing applied");
            Ok(())
        })
    }

    /// Grants temporary hit points. They don't stack: the larger pool wins.
    ///
    /// Tracked under [`CombatOp::Healing`].
    pub fn set_temporary_hit_points(
        &mut self,
        target: ParticipantId,
        amount: u32,
    ) -> Result<Transition, CombatError> {
        self.modify(CombatOp::Healing, target, |p| {
            p.temporary_hit_points = p.temporary_hit_points.max(amount);
            Ok(())
        })
    }

    /// Adds a condition. `Unconscious` is driven by hit points and is
    /// refused here.
    pub fn add_condition(
        &mut self,
        target: ParticipantId,
        condition: Condition,
    ) -> Result<Transition, CombatError> {
        self.modify(CombatOp::Condition, target, |p| {
            if condition == Condition::Unconscious {
                return Err(CombatError::ConditionLocked(p.id));
            }
            debug!(target = %p.id, %condition, "condition added");
            p.conditions.insert(condition);
            Ok(())
        })
    }

    /// Removes a condition. `Unconscious` is driven by hit points and is
    /// refused here.
    pub fn remove_condition(
        &mut self,
        target: ParticipantId,
        condition: &Condition,
    ) -> Result<Transition, CombatError> {
        self.modify(CombatOp::Condition, target, |p| {
            if *condition == Condition::Unconscious {
                return Err(CombatError::ConditionLocked(p.id));
            }
            p.conditions.remove(condition);
            Ok(())
        })
    }

    /// Looks up `target`, runs `change` on a copy and commits it only if
    /// `change` succeeds.
    fn modify<F>(&mut self, key: CombatOp, target: ParticipantId, change: F) -> Result<Transition, CombatError>
    where
        F: FnOnce(&mut CombatParticipant) -> Result<(), CombatError>,
    {
        let Some(mut updated) = self.participants.get(&target).cloned() else {
            return self.reject(key, CombatError::UnknownParticipant(target));
        };
        if let Err(error) = change(&mut updated) {
            return self.reject(key, error);
        }

        let before = CombatPatch::capture(self, &[target]);
        self.participants.insert(target, updated);
        self.status.succeed(key);

        Ok(Transition {
            before,
            after: CombatPatch::capture(self, &[target]),
        })
    }
}
