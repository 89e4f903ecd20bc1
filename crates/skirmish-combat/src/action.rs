//! Combat actions and the action log.

use std::fmt;

use serde::{Deserialize, Serialize};
use skirmish_protocol::ParticipantId;

/// What an action does to the actor's turn economy.
///
/// Internally tagged so the wire form is flat:
/// `{ "type": "MOVE", "distance": 15, "actor_id": 2, ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    /// Uses the action.
    Attack,
    /// Uses the action.
    CastSpell,
    /// Uses the action.
    Dodge,
    /// Uses the bonus action.
    BonusAction,
    /// Uses the reaction.
    Reaction,
    /// Spends `distance` feet of movement.
    Move { distance: u32 },
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attack => f.write_str("attack"),
            Self::CastSpell => f.write_str("cast spell"),
            Self::Dodge => f.write_str("dodge"),
            Self::BonusAction => f.write_str("bonus action"),
            Self::Reaction => f.write_str("reaction"),
            Self::Move { distance } => write!(f, "move {distance} ft"),
        }
    }
}

/// A request from a client to act in combat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatAction {
    #[serde(flatten)]
    pub kind: ActionKind,
    pub actor_id: ParticipantId,
    #[serde(default)]
    pub target_id: Option<ParticipantId>,
    /// Free-form details the rules layer attaches (weapon, spell slot...).
    /// Carried through to the log untouched.
    #[serde(default)]
    pub data: serde_json::Value,
}

impl CombatAction {
    pub fn new(kind: ActionKind, actor_id: ParticipantId) -> Self {
        Self {
            kind,
            actor_id,
            target_id: None,
            data: serde_json::Value::Null,
        }
    }

    pub fn targeting(mut self, target_id: ParticipantId) -> Self {
        self.target_id = Some(target_id);
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }
}

/// An entry in the append-only action history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Sequential within one combat, starting at 1.
    pub id: u64,
    pub round: u32,
    pub turn: u32,
    pub action: CombatAction,
    /// Unix milliseconds.
    pub timestamp: u64,
}

/// Damage types, carried for logging and future resistance handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    Acid,
    Bludgeoning,
    Cold,
    Fire,
    Force,
    Lightning,
    Necrotic,
    Piercing,
    Poison,
    Psychic,
    Radiant,
    Slashing,
    Thunder,
}
