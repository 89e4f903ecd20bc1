//! Combatants and their per-turn resources.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use skirmish_protocol::ParticipantId;

/// Default walking speed in feet.
pub const DEFAULT_MOVEMENT: u32 = 30;

/// Whether a participant is controlled by a player or by the DM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    PlayerCharacter,
    Npc,
}

/// A status tag affecting a participant.
///
/// The standard conditions plus `Custom` for table-specific tags.
/// `Unconscious` is special: the store keeps it in lockstep with hit
/// points, so it is present exactly when `hit_points_current == 0`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Blinded,
    Charmed,
    Deafened,
    Frightened,
    Grappled,
    Incapacitated,
    Invisible,
    Paralyzed,
    Petrified,
    Poisoned,
    Prone,
    Restrained,
    Stunned,
    Unconscious,
    Custom(String),
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Blinded => "blinded",
            Self::Charmed => "charmed",
            Self::Deafened => "deafened",
            Self::Frightened => "frightened",
            Self::Grappled => "grappled",
            Self::Incapacitated => "incapacitated",
            Self::Invisible => "invisible",
            Self::Paralyzed => "paralyzed",
            Self::Petrified => "petrified",
            Self::Poisoned => "poisoned",
            Self::Prone => "prone",
            Self::Restrained => "restrained",
            Self::Stunned => "stunned",
            Self::Unconscious => "unconscious",
            Self::Custom(tag) => tag.as_str(),
        };
        f.write_str(name)
    }
}

/// One combatant in an encounter.
///
/// Invariants maintained by the store:
/// - `hit_points_current <= hit_points_max`
/// - `hit_points_current == 0` exactly when `Unconscious` is in `conditions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatParticipant {
    pub id: ParticipantId,
    pub name: String,
    pub category: Category,

    /// Rolled initiative (d20 + modifier). Set by the store on start/add.
    pub initiative: i32,
    pub initiative_modifier: i32,

    pub hit_points_current: u32,
    pub hit_points_max: u32,
    pub temporary_hit_points: u32,
    pub armor_class: u32,

    /// Speed in feet per turn, and how much of it was spent this turn.
    pub movement_max: u32,
    pub movement_used: u32,

    pub has_acted: bool,
    pub has_bonus_acted: bool,
    pub has_reacted: bool,

    pub conditions: BTreeSet<Condition>,
}

impl CombatParticipant {
    /// A healthy participant at full hit points with default speed and AC 10.
    pub fn new(
        id: ParticipantId,
        name: impl Into<String>,
        category: Category,
        hit_points_max: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            initiative: 0,
            initiative_modifier: 0,
            hit_points_current: hit_points_max,
            hit_points_max,
            temporary_hit_points: 0,
            armor_class: 10,
            movement_max: DEFAULT_MOVEMENT,
            movement_used: 0,
            has_acted: false,
            has_bonus_acted: false,
            has_reacted: false,
            conditions: BTreeSet::new(),
        }
    }

    pub fn with_initiative_modifier(mut self, modifier: i32) -> Self {
        self.initiative_modifier = modifier;
        self
    }

    pub fn with_armor_class(mut self, armor_class: u32) -> Self {
        self.armor_class = armor_class;
        self
    }

    pub fn with_movement(mut self, movement_max: u32) -> Self {
        self.movement_max = movement_max;
        self
    }

    pub fn with_hit_points(mut self, current: u32) -> Self {
        self.hit_points_current = current;
        self
    }

    /// Feet of movement left this turn. Zero when over-extended.
    pub fn movement_remaining(&self) -> u32 {
        self.movement_max.saturating_sub(self.movement_used)
    }

    pub fn is_unconscious(&self) -> bool {
        self.conditions.contains(&Condition::Unconscious)
    }

    pub fn has_condition(&self, condition: &Condition) -> bool {
        self.conditions.contains(condition)
    }

    /// Clears the per-turn flags and spent movement.
    pub(crate) fn reset_turn(&mut self) {
        self.has_acted = false;
        self.has_bonus_acted = false;
        self.has_reacted = false;
        self.movement_used = 0;
    }

    /// Re-establishes the hit point invariants.
    ///
    /// Clamps current HP to the maximum and makes `Unconscious` mirror
    /// `hit_points_current == 0`. Idempotent.
    pub(crate) fn normalize(&mut self) {
        self.hit_points_current = self.hit_points_current.min(self.hit_points_max);
        if self.hit_points_current == 0 {
            self.conditions.insert(Condition::Unconscious);
        } else {
            self.conditions.remove(&Condition::Unconscious);
        }
    }
}
