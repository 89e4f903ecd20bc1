//! Combat rules configuration.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::participant::DEFAULT_MOVEMENT;

/// What to do when a move asks for more feet than the participant has left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MovementPolicy {
    /// Refuse the move with a validation error. Nothing is spent.
    #[default]
    Reject,
    /// Spend only what is left; `movement_used` stops at `movement_max`.
    Clamp,
    /// Spend it all; `movement_used` may exceed `movement_max`.
    /// For tables that adjudicate dashes and difficult terrain by hand.
    Allow,
}

/// Settings for a [`CombatStore`](crate::CombatStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Over-extension handling for `Move` actions.
    pub movement_policy: MovementPolicy,

    /// Speed given to participants that enter combat with `movement_max == 0`.
    pub default_movement: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            movement_policy: MovementPolicy::Reject,
            default_movement: DEFAULT_MOVEMENT,
        }
    }
}

impl CombatConfig {
    /// Fastest speed any creature plausibly has, in feet.
    pub const MAX_MOVEMENT: u32 = 1_000;

    pub fn with_movement_policy(movement_policy: MovementPolicy) -> Self {
        Self {
            movement_policy,
            ..Self::default()
        }
    }

    /// Clamp values to valid ranges.
    pub fn validated(mut self) -> Self {
        if self.default_movement == 0 {
            warn!("default_movement is zero, using {DEFAULT_MOVEMENT}");
            self.default_movement = DEFAULT_MOVEMENT;
        }
        if self.default_movement > Self::MAX_MOVEMENT {
            warn!(
                movement = self.default_movement,
                max = Self::MAX_MOVEMENT,
                "default_movement exceeds maximum, clamping"
            );
            self.default_movement = Self::MAX_MOVEMENT;
        }
        self
    }
}
