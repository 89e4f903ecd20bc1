//! Integration tests for the combat store: initiative, turn flow, actions
//! and restoring from transitions.

use std::collections::VecDeque;

use skirmish_combat::{
    ActionKind, Category, CombatAction, CombatConfig, CombatError, CombatOp, CombatParticipant,
    CombatStore, DEFAULT_MOVEMENT, DamageType, MovementPolicy, Roller, SeededRoller,
};
use skirmish_protocol::{ParticipantId, SessionId};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Hands out scripted d20 faces in order, then 10s.
struct ScriptedRoller {
    faces: VecDeque<i32>,
}

impl ScriptedRoller {
    fn new(faces: &[i32]) -> Self {
        Self {
            faces: faces.iter().copied().collect(),
        }
    }

    fn flat() -> Self {
        Self::new(&[])
    }
}

impl Roller for ScriptedRoller {
    fn roll_d20(&mut self, modifier: i32) -> i32 {
        self.faces.pop_front().unwrap_or(10) + modifier
    }
}

fn pid(n: u64) -> ParticipantId {
    ParticipantId(n)
}

fn pc(n: u64, name: &str, modifier: i32) -> CombatParticipant {
    CombatParticipant::new(pid(n), name, Category::PlayerCharacter, 20).with_initiative_modifier(modifier)
}

fn npc(n: u64, name: &str, modifier: i32) -> CombatParticipant {
    CombatParticipant::new(pid(n), name, Category::Npc, 20).with_initiative_modifier(modifier)
}

/// Three participants whose totals are 25, 28 and 22 with a flat roller.
fn party() -> Vec<CombatParticipant> {
    vec![pc(1, "Aria", 15), pc(2, "Brom", 18), npc(3, "Cultist", 12)]
}

fn started(config: CombatConfig) -> CombatStore {
    let mut store = CombatStore::new(config);
    store
        .start_combat(SessionId(1), party(), &mut ScriptedRoller::flat())
        .unwrap();
    store
}

fn act(kind: ActionKind, actor: u64) -> CombatAction {
    CombatAction::new(kind, pid(actor))
}

// ---------------------------------------------------------------------------
// Initiative
// ---------------------------------------------------------------------------

#[test]
fn test_start_combat_sorts_descending_and_sets_cursor() {
    let store = started(CombatConfig::default());

    assert!(store.is_active());
    assert_eq!(store.session_id(), Some(SessionId(1)));
    assert_eq!(store.initiative_order(), &[pid(2), pid(1), pid(3)]);
    assert_eq!(store.current_participant_id(), Some(pid(2)));
    assert_eq!(store.round(), 1);
    assert_eq!(store.turn(), 0);
    assert_eq!(store.participant(pid(2)).unwrap().initiative, 28);
}

#[test]
fn test_start_combat_ties_break_on_modifier_then_registration() {
    let mut store = CombatStore::default();
    // Totals: 15, 15, 15, 15.
    let roller = &mut ScriptedRoller::new(&[13, 10, 12, 12]);
    let participants = vec![pc(1, "A", 2), pc(2, "B", 5), pc(3, "C", 3), pc(4, "D", 3)];

    store.start_combat(SessionId(1), participants, roller).unwrap();

    assert_eq!(store.initiative_order(), &[pid(2), pid(3), pid(4), pid(1)]);
}

#[test]
fn test_start_combat_extreme_modifiers_keep_order() {
    let mut store = CombatStore::default();
    let participants = vec![pc(1, "Slow", i32::MIN), pc(2, "Huge", i32::MAX), pc(3, "Plain", 0)];

    store
        .start_combat(SessionId(1), participants, &mut SeededRoller::new(1))
        .unwrap();

    assert_eq!(store.initiative_order(), &[pid(2), pid(3), pid(1)]);
    assert_eq!(store.participant(pid(2)).unwrap().initiative, i32::MAX);
}

#[test]
fn test_start_combat_normalizes_entrants() {
    let mut store = CombatStore::default();
    let wounded = pc(1, "Wounded", 0).with_hit_points(0).with_movement(0);
    let overhealed = pc(2, "Overhealed", 0).with_hit_points(99);

    store
        .start_combat(SessionId(1), vec![wounded, overhealed], &mut ScriptedRoller::flat())
        .unwrap();

    let wounded = store.participant(pid(1)).unwrap();
    assert!(wounded.is_unconscious());
    assert_eq!(wounded.movement_max, DEFAULT_MOVEMENT);
    assert_eq!(store.participant(pid(2)).unwrap().hit_points_current, 20);
}

#[test]
fn test_start_combat_duplicate_ids_rejected() {
    let mut store = CombatStore::default();

    let err = store
        .start_combat(SessionId(1), vec![pc(1, "A", 0), pc(1, "A again", 0)], &mut ScriptedRoller::flat())
        .unwrap_err();

    assert_eq!(err, CombatError::DuplicateParticipant(pid(1)));
    assert!(!store.is_active());
    assert!(store.error(CombatOp::Roster).is_some());
}

// ---------------------------------------------------------------------------
// Turn flow
// ---------------------------------------------------------------------------

#[test]
fn test_next_turn_wraps_and_increments_round() {
    let mut store = started(CombatConfig::default());

    store.next_turn().unwrap();
    assert_eq!(store.current_participant_id(), Some(pid(1)));
    store.next_turn().unwrap();
    assert_eq!(store.current_participant_id(), Some(pid(3)));
    assert_eq!(store.round(), 1);

    store.next_turn().unwrap();
    assert_eq!(store.current_participant_id(), Some(pid(2)));
    assert_eq!(store.round(), 2);
    assert_eq!(store.turn(), 3);
}

#[test]
fn test_next_turn_resets_outgoing_and_clears_pending() {
    let mut store = started(CombatConfig::default());
    store.execute_combat_action(act(ActionKind::Attack, 2)).unwrap();
    store
        .execute_combat_action(act(ActionKind::Move { distance: 20 }, 2))
        .unwrap();
    assert!(store.pending_action().is_some());

    store.next_turn().unwrap();

    let brom = store.participant(pid(2)).unwrap();
    assert!(!brom.has_acted);
    assert_eq!(brom.movement_used, 0);
    assert!(store.pending_action().is_none());
}

#[test]
fn test_next_turn_inactive_is_noop() {
    let mut store = CombatStore::default();
    assert!(store.next_turn().is_none());
    assert_eq!(store.turn(), 0);
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

#[test]
fn test_execute_action_wrong_actor_rejected_without_mutation() {
    let mut store = started(CombatConfig::default());
    let snapshot: Vec<CombatParticipant> =
        store.participants_in_order().into_iter().cloned().collect();

    let err = store
        .execute_combat_action(act(ActionKind::Attack, 3).targeting(pid(2)))
        .unwrap_err();

    assert!(matches!(err, CombatError::NotYourTurn { actor, .. } if actor == pid(3)));
    assert!(store.error(CombatOp::Action).unwrap().contains("Not your turn"));
    let after: Vec<CombatParticipant> = store.participants_in_order().into_iter().cloned().collect();
    assert_eq!(snapshot, after);
    assert!(store.history().is_empty());
    assert!(store.pending_action().is_none());
}

#[test]
fn test_execute_action_inactive_rejected() {
    let mut store = CombatStore::default();
    let err = store.execute_combat_action(act(ActionKind::Attack, 1)).unwrap_err();
    assert_eq!(err, CombatError::NotActive);
    let message = store.error(CombatOp::Action).unwrap();
    assert_eq!(message, "combat is not active");
    assert!(!message.contains("Not your turn"));
}

#[test]
fn test_execute_action_sets_flags_and_logs() {
    let mut store = started(CombatConfig::default());

    store.execute_combat_action(act(ActionKind::CastSpell, 2)).unwrap();
    store.execute_combat_action(act(ActionKind::BonusAction, 2)).unwrap();
    store.execute_combat_action(act(ActionKind::Reaction, 2)).unwrap();

    let brom = store.participant(pid(2)).unwrap();
    assert!(brom.has_acted && brom.has_bonus_acted && brom.has_reacted);

    let ids: Vec<u64> = store.history().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(store.history()[0].round, 1);
    assert_eq!(
        store.pending_action().map(|a| a.kind.clone()),
        Some(ActionKind::Reaction)
    );
    assert_eq!(store.error(CombatOp::Action), None);
}

#[test]
fn test_move_over_budget_rejected_by_default() {
    let mut store = started(CombatConfig::default());
    store
        .execute_combat_action(act(ActionKind::Move { distance: 20 }, 2))
        .unwrap();

    let err = store
        .execute_combat_action(act(ActionKind::Move { distance: 15 }, 2))
        .unwrap_err();

    assert_eq!(
        err,
        CombatError::MovementExceeded {
            requested: 15,
            remaining: 10
        }
    );
    assert!(
        store
            .error(CombatOp::Action)
            .unwrap()
            .contains("movement exceeds remaining")
    );
    assert_eq!(store.participant(pid(2)).unwrap().movement_used, 20);
    assert_eq!(store.history().len(), 1);
}

#[test]
fn test_move_over_budget_clamped() {
    let mut store = started(CombatConfig::with_movement_policy(MovementPolicy::Clamp));

    store
        .execute_combat_action(act(ActionKind::Move { distance: 45 }, 2))
        .unwrap();

    assert_eq!(store.participant(pid(2)).unwrap().movement_used, 30);
}

#[test]
fn test_move_over_budget_allowed() {
    let mut store = started(CombatConfig::with_movement_policy(MovementPolicy::Allow));

    store
        .execute_combat_action(act(ActionKind::Move { distance: 45 }, 2))
        .unwrap();

    let brom = store.participant(pid(2)).unwrap();
    assert_eq!(brom.movement_used, 45);
    assert_eq!(brom.movement_remaining(), 0);
}

#[test]
fn test_action_transition_undo_keeps_log() {
    let mut store = started(CombatConfig::default());

    let t = store.execute_combat_action(act(ActionKind::Attack, 2)).unwrap();
    store.restore_state(&t.before);

    assert!(!store.participant(pid(2)).unwrap().has_acted);
    assert!(store.pending_action().is_none());
    assert_eq!(store.history().len(), 1);

    store.restore_state(&t.after);
    assert!(store.participant(pid(2)).unwrap().has_acted);
}

// ---------------------------------------------------------------------------
// Roster changes
// ---------------------------------------------------------------------------

#[test]
fn test_add_participant_mid_combat_rolls_and_sorts() {
    let mut store = started(CombatConfig::default());

    store
        .add_participant(npc(4, "Ogre", 20), &mut ScriptedRoller::new(&[20]))
        .unwrap();

    assert_eq!(store.initiative_order()[0], pid(4));
    assert_eq!(store.participant(pid(4)).unwrap().initiative, 40);
    // Adding doesn't steal the turn.
    assert_eq!(store.current_participant_id(), Some(pid(2)));
}

#[test]
fn test_add_participant_duplicate_rejected() {
    let mut store = started(CombatConfig::default());
    let err = store
        .add_participant(pc(1, "Aria twin", 0), &mut ScriptedRoller::flat())
        .unwrap_err();
    assert_eq!(err, CombatError::DuplicateParticipant(pid(1)));
    assert_eq!(store.initiative_order().len(), 3);
}

#[test]
fn test_remove_current_participant_hands_turn_to_slot() {
    let mut store = started(CombatConfig::default());

    store.remove_participant(pid(2)).unwrap();

    assert_eq!(store.initiative_order(), &[pid(1), pid(3)]);
    assert_eq!(store.current_participant_id(), Some(pid(1)));
    assert_eq!(store.round(), 1);
    assert_eq!(store.turn(), 0);
}

#[test]
fn test_remove_last_in_order_wraps_to_first() {
    let mut store = started(CombatConfig::default());
    store.set_current_participant(pid(3)).unwrap();

    store.remove_participant(pid(3)).unwrap();

    assert_eq!(store.current_participant_id(), Some(pid(2)));
}

#[test]
fn test_remove_everyone_clears_current() {
    let mut store = started(CombatConfig::default());
    for id in [1, 2, 3] {
        store.remove_participant(pid(id)).unwrap();
    }
    assert_eq!(store.current_participant_id(), None);
    assert!(store.next_turn().is_none());
}

#[test]
fn test_remove_participant_undo_restores_roster_and_turn() {
    let mut store = started(CombatConfig::default());
    store
        .apply_damage(pid(2), 7, DamageType::Bludgeoning)
        .unwrap();

    let t = store.remove_participant(pid(2)).unwrap();
    store.restore_state(&t.before);

    assert_eq!(store.initiative_order(), &[pid(2), pid(1), pid(3)]);
    assert_eq!(store.current_participant_id(), Some(pid(2)));
    assert_eq!(store.participant(pid(2)).unwrap().hit_points_current, 13);
}

#[test]
fn test_set_current_participant_unknown_rejected() {
    let mut store = started(CombatConfig::default());
    let err = store.set_current_participant(pid(99)).unwrap_err();
    assert_eq!(err, CombatError::UnknownParticipant(pid(99)));
    assert_eq!(store.current_participant_id(), Some(pid(2)));
}

#[test]
fn test_set_current_participant_clears_stale_roster_error() {
    let mut store = started(CombatConfig::default());
    store.set_current_participant(pid(99)).unwrap_err();
    assert!(store.error(CombatOp::Roster).is_some());

    store.set_current_participant(pid(3)).unwrap();

    assert_eq!(store.current_participant_id(), Some(pid(3)));
    assert_eq!(store.error(CombatOp::Roster), None);
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn test_end_combat_resets_and_keeps_config() {
    let mut store = started(CombatConfig::with_movement_policy(MovementPolicy::Allow));
    store.execute_combat_action(act(ActionKind::Dodge, 2)).unwrap();

    store.end_combat();

    assert!(!store.is_active());
    assert_eq!(store.round(), 0);
    assert!(store.initiative_order().is_empty());
    assert!(store.history().is_empty());
    assert_eq!(store.current_participant(), None);
    assert_eq!(store.config().movement_policy, MovementPolicy::Allow);
}

#[test]
fn test_end_combat_undo_restores_encounter() {
    let mut store = started(CombatConfig::default());
    store.execute_combat_action(act(ActionKind::Attack, 2)).unwrap();
    store.next_turn().unwrap();

    let t = store.end_combat();
    store.restore_state(&t.before);

    assert!(store.is_active());
    assert_eq!(store.current_participant_id(), Some(pid(1)));
    assert_eq!(store.history().len(), 1);

    // The log keeps numbering where it left off.
    store.execute_combat_action(act(ActionKind::Attack, 1)).unwrap();
    assert_eq!(store.history()[1].id, 2);
}

#[test]
fn test_start_combat_undo_returns_to_empty() {
    let mut store = CombatStore::default();
    let t = store
        .start_combat(SessionId(4), party(), &mut ScriptedRoller::flat())
        .unwrap();

    store.restore_state(&t.before);

    assert!(!store.is_active());
    assert!(store.participants_in_order().is_empty());
    assert_eq!(store.session_id(), None);
}

#[test]
fn test_hp_invariant_holds_across_mixed_operations() {
    let mut store = started(CombatConfig::default());
    let script: [(bool, u32); 8] = [
        (true, 5),
        (true, 30),
        (false, 4),
        (true, 1),
        (false, 100),
        (true, 19),
        (true, 1),
        (false, 1),
    ];

    for (is_damage, amount) in script {
        if is_damage {
            store.apply_damage(pid(1), amount, DamageType::Necrotic).unwrap();
        } else {
            store.apply_healing(pid(1), amount).unwrap();
        }
        let p = store.participant(pid(1)).unwrap();
        assert!(p.hit_points_current <= p.hit_points_max);
        assert_eq!(p.hit_points_current == 0, p.is_unconscious());
    }
}
