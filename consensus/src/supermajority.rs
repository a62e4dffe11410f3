//! Supermajority rules for the Kf+1 consistency models.

use serde::{Deserialize, Serialize};

/// Fault model of the peer set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsistencyModel {
    /// Byzantine faults: `N = 3f + 1`.
    #[default]
    Bft,
    /// Crash faults: `N = 2f + 1`.
    Cft,
}

impl ConsistencyModel {
    /// The `k` of the Kf+1 model.
    fn k(self) -> u64 {
        match self {
            Self::Bft => 3,
            Self::Cft => 2,
        }
    }
}

/// Decides whether a number of agreeing peers is a supermajority.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SupermajorityChecker {
    model: ConsistencyModel,
}

impl SupermajorityChecker {
    pub fn new(model: ConsistencyModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> ConsistencyModel {
        self.model
    }

    /// Whether `current` agreeing peers out of `all` form a supermajority:
    /// `current * k >= (k - 1) * (all - 1) + k`.
    pub fn has_supermajority(&self, current: usize, all: usize) -> bool {
        if current > all || all == 0 {
            return false;
        }
        let k = self.model.k();
        let (current, all) = (current as u64, all as u64);
        current * k >= (k - 1) * (all - 1) + k
    }
}
