//! RNG module - upcoming piece generation
//!
//! Implements the "7-bag" randomization used in modern Tetris: each bag holds
//! one of each piece (I, O, T, S, Z, J, L), shuffled, and is drawn empty before
//! the next bag is generated. Any kind therefore repeats within at most 13
//! draws. A uniform randomizer is available as an alternative.
//!
//! The queue is explicit state owned by the game loop and seeded from the
//! game configuration, so a seed reproduces a game exactly.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::types::{PieceKind, MAX_PREVIEW_LEN};

/// Pieces kept generated ahead of the current draw, so a full preview is
/// always readable without mutation
const LOOKAHEAD: usize = MAX_PREVIEW_LEN + 1;

/// How the next piece kinds are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Randomizer {
    /// Shuffled permutation of all seven kinds, regenerated when exhausted
    #[default]
    Bag,
    /// Independent uniform draw per piece
    Uniform,
}

impl Randomizer {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "bag" | "7bag" | "7-bag" => Some(Randomizer::Bag),
            "uniform" | "random" => Some(Randomizer::Uniform),
            _ => None,
        }
    }
}

/// Upcoming piece queue
#[derive(Debug, Clone)]
pub struct PieceQueue {
    randomizer: Randomizer,
    /// Generated but not yet drawn pieces, oldest first
    upcoming: VecDeque<PieceKind>,
    rng: StdRng,
    seed: u64,
}

impl PieceQueue {
    /// Create a new piece queue with the given randomizer and seed
    pub fn new(randomizer: Randomizer, seed: u64) -> Self {
        let mut queue = Self {
            randomizer,
            upcoming: VecDeque::with_capacity(14),
            rng: StdRng::seed_from_u64(seed),
            seed,
        };
        queue.ensure(LOOKAHEAD);
        queue
    }

    /// Shorthand for a bag queue
    pub fn bag(seed: u64) -> Self {
        Self::new(Randomizer::Bag, seed)
    }

    /// Append one more batch of pieces
    fn refill(&mut self) {
        match self.randomizer {
            Randomizer::Bag => {
                let mut bag = PieceKind::ALL;
                bag.shuffle(&mut self.rng);
                self.upcoming.extend(bag);
            }
            Randomizer::Uniform => {
                for _ in 0..PieceKind::ALL.len() {
                    let idx = self.rng.gen_range(0..PieceKind::ALL.len());
                    self.upcoming.push_back(PieceKind::ALL[idx]);
                }
            }
        }
    }

    fn ensure(&mut self, count: usize) {
        while self.upcoming.len() < count {
            self.refill();
        }
    }

    /// Peek at the next piece without removing it
    pub fn peek(&self) -> PieceKind {
        // ensure() keeps LOOKAHEAD pieces queued at all times
        self.upcoming.front().copied().unwrap_or(PieceKind::I)
    }

    /// Upcoming pieces in draw order, without consuming them.
    /// Always yields at least `MAX_PREVIEW_LEN` kinds.
    pub fn upcoming(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.upcoming.iter().copied()
    }

    /// Draw the next piece from the queue
    pub fn draw(&mut self) -> PieceKind {
        let piece = self.peek();
        self.upcoming.pop_front();
        self.ensure(LOOKAHEAD);
        piece
    }

    pub fn randomizer(&self) -> Randomizer {
        self.randomizer
    }

    /// Seed the queue was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Regenerate the queue from its original seed
    pub fn reset(&mut self) {
        *self = Self::new(self.randomizer, self.seed);
    }
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::bag(1)
    }
}
