//! Injected randomness for initiative rolls.
//!
//! The store never reaches for a global RNG. Callers pass a [`Roller`],
//! so tests can script exact rolls and replays can reuse a seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of d20 rolls.
pub trait Roller {
    /// Rolls 1d20 and adds `modifier`, saturating at the `i32` bounds.
    fn roll_d20(&mut self, modifier: i32) -> i32;
}

/// Rolls with the thread-local RNG. Use for live play.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomRoller;

impl Roller for RandomRoller {
    fn roll_d20(&mut self, modifier: i32) -> i32 {
        rand::rng().random_range(1..=20_i32).saturating_add(modifier)
    }
}

/// Deterministic rolls from a seed. Same seed, same sequence.
#[derive(Debug, Clone)]
pub struct SeededRoller {
    rng: StdRng,
}

impl SeededRoller {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Roller for SeededRoller {
    fn roll_d20(&mut self, modifier: i32) -> i32 {
        self.rng.random_range(1..=20_i32).saturating_add(modifier)
    }
}
