//! A scripted encounter against an in-memory session backend.
//!
//! Run with `RUST_LOG=debug` to see every reducer step. Pass a number to
//! change the initiative seed.

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use skirmish::prelude::*;
use skirmish::protocol::now_millis;

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

/// Sessions kept in a map. Stands in for the real persistence service.
#[derive(Default)]
struct InMemoryApi {
    sessions: Mutex<HashMap<SessionId, GameSession>>,
    next_id: Mutex<u64>,
}

impl InMemoryApi {
    fn modify(&self, id: SessionId, f: impl FnOnce(&mut GameSession)) -> Result<GameSession, String> {
        let mut sessions = self.sessions.lock().map_err(|e| e.to_string())?;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| format!("session {id} not found"))?;
        f(session);
        session.updated_at = now_millis();
        Ok(session.clone())
    }
}

impl SessionApi for InMemoryApi {
    type Error = String;

    async fn get_sessions(&self) -> Result<Vec<GameSession>, String> {
        let sessions = self.sessions.lock().map_err(|e| e.to_string())?;
        Ok(sessions.values().cloned().collect())
    }

    async fn create_session(&self, draft: SessionDraft) -> Result<GameSession, String> {
        let id = {
            let mut next = self.next_id.lock().map_err(|e| e.to_string())?;
            *next += 1;
            SessionId(*next)
        };
        let now = now_millis();
        let session = GameSession {
            id,
            dm_id: draft.dm_id,
            player_ids: BTreeSet::new(),
            campaign_id: draft.campaign_id,
            combat_active: false,
            session_notes: draft.session_notes,
            created_at: now,
            updated_at: now,
        };
        self.sessions
            .lock()
            .map_err(|e| e.to_string())?
            .insert(id, session.clone());
        Ok(session)
    }

    async fn join_session(&self, id: SessionId, player: PlayerId) -> Result<GameSession, String> {
        self.modify(id, |s| {
            s.player_ids.insert(player);
        })
    }

    async fn leave_session(&self, id: SessionId, player: PlayerId) -> Result<GameSession, String> {
        self.modify(id, |s| {
            s.player_ids.remove(&player);
        })
    }

    async fn update_session(&self, id: SessionId, update: SessionUpdate) -> Result<GameSession, String> {
        self.modify(id, |s| update.apply_to(s, now_millis()))
    }
}

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

const DM: PlayerId = PlayerId(1);
const ARIA: ParticipantId = ParticipantId(1);
const BROM: ParticipantId = ParticipantId(2);
const GOBLIN: ParticipantId = ParticipantId(3);

fn party() -> Vec<CombatParticipant> {
    vec![
        CombatParticipant::new(ARIA, "Aria", Category::PlayerCharacter, 24)
            .with_initiative_modifier(3)
            .with_armor_class(15),
        CombatParticipant::new(BROM, "Brom", Category::PlayerCharacter, 31)
            .with_initiative_modifier(0)
            .with_armor_class(18)
            .with_movement(25),
        CombatParticipant::new(GOBLIN, "Goblin", Category::Npc, 7)
            .with_initiative_modifier(2)
            .with_armor_class(13),
    ]
}

/// Whoever holds the turn attacks, then moves. The heroes go for the
/// goblin; the goblin goes for `goblin_target`.
fn take_turn(
    table: &mut Table<InMemoryApi>,
    goblin_target: ParticipantId,
    damage: u32,
) -> Result<(), SkirmishError> {
    let Some(actor) = table.combat().current_participant_id() else {
        return Ok(());
    };
    if table.combat().participant(actor).is_some_and(|p| p.is_unconscious()) {
        tracing::info!(%actor, "skips the turn, unconscious");
        table.next_turn();
        return Ok(());
    }

    let target = if actor == GOBLIN { goblin_target } else { GOBLIN };
    table.execute_combat_action(
        CombatAction::new(ActionKind::Attack, actor)
            .targeting(target)
            .with_data(serde_json::json!({ "weapon": "longsword" })),
    )?;
    table.apply_damage(target, damage, DamageType::Slashing)?;
    table.execute_combat_action(CombatAction::new(ActionKind::Move { distance: 10 }, actor))?;
    table.next_turn();
    Ok(())
}

fn print_board(table: &Table<InMemoryApi>) {
    let combat = table.combat();
    println!("round {} turn {}", combat.round(), combat.turn());
    for p in combat.participants_in_order() {
        let marker = if Some(p.id) == combat.current_participant_id() { ">" } else { " " };
        let conditions: Vec<String> = p.conditions.iter().map(ToString::to_string).collect();
        println!(
            "{marker} {:<8} init {:>2}  hp {:>2}/{:<2}  {}",
            p.name,
            p.initiative,
            p.hit_points_current,
            p.hit_points_max,
            conditions.join(", ")
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    skirmish::init_tracing();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(7);

    let mut table = Table::new(InMemoryApi::default(), TableConfig::default())
        .with_roller(SeededRoller::new(seed));

    let session = table
        .create_session(SessionDraft {
            session_notes: "The goblin ambush on the Triboar Trail".into(),
            ..SessionDraft::new(DM).in_campaign(CampaignId(1))
        })
        .await?;
    table.join_session(session.id, PlayerId(2)).await?;

    table.start_combat(party()).await?;
    print_board(&table);

    for (goblin_target, damage) in [(ARIA, 4), (BROM, 3), (ARIA, 5), (BROM, 2)] {
        take_turn(&mut table, goblin_target, damage)?;
    }
    print_board(&table);

    if let Some(description) = table.undo().await {
        println!("undid: {description}");
    }
    if let Some(description) = table.redo().await {
        println!("redid: {description}");
    }

    table.edit_notes("Goblins routed; Brom took the map");
    table.save_notes().await?;

    let history = table.combat().history().len();
    table.end_combat().await?;

    let stored = table
        .directory()
        .session(session.id)
        .await
        .ok_or("session vanished")?;
    println!(
        "{} actions logged, campaign: {:?}, combat active: {}, notes: {:?}",
        history, stored.campaign_id, stored.combat_active, stored.session_notes
    );
    Ok(())
}
