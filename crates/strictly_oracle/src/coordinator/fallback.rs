//! Local move choice used when the decision source gives nothing usable.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use strictly_board::Board;

/// How the fallback picks among empty cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Uniformly at random.
    #[default]
    Random,
    /// Lowest-index empty cell.
    FirstEmpty,
}

/// Fallback chooser with its own random stream.
#[derive(Debug)]
pub struct Fallback {
    policy: FallbackPolicy,
    rng: StdRng,
}

impl Fallback {
    /// Creates a chooser. A fixed `seed` makes random picks reproducible.
    pub fn new(policy: FallbackPolicy, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { policy, rng }
    }

    /// The configured policy.
    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    /// Picks an empty cell, or `None` on a full board.
    pub fn choose(&mut self, board: &Board) -> Option<usize> {
        let empty = board.empty_indices();
        match self.policy {
            FallbackPolicy::Random => empty.choose(&mut self.rng).copied(),
            FallbackPolicy::FirstEmpty => empty.first().copied(),
        }
    }
}
