//! Voting rounds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A `(block_round, reject_round)` pair identifying one voting attempt.
///
/// `block_round` is the height of the block being agreed on and
/// `reject_round` counts the failed attempts at that height. Rounds order
/// lexicographically: first by `block_round`, then by `reject_round`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Round {
    pub block_round: u64,
    pub reject_round: u64,
}

impl Round {
    pub const fn new(block_round: u64, reject_round: u64) -> Self {
        Self {
            block_round,
            reject_round,
        }
    }

    /// First attempt at the next height.
    pub fn next_block_round(&self) -> Self {
        Self::new(self.block_round + 1, 0)
    }

    /// Next attempt at the same height.
    pub fn next_reject_round(&self) -> Self {
        Self::new(self.block_round, self.reject_round + 1)
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.block_round, self.reject_round)
    }
}
