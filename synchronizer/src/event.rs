//! Public result of the synchronizer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use quorum_types::{LedgerState, Round};

/// What a processed gate decision did to the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SynchronizationOutcomeType {
    /// One or more blocks were committed.
    Commit,
    /// The round was rejected; nothing was committed.
    Reject,
    /// The round agreed on nothing.
    Nothing,
}

/// Emitted once per gate decision that resolved; consumed by the proposal
/// source to schedule the next round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SynchronizationEvent {
    pub sync_outcome: SynchronizationOutcomeType,
    pub round: Round,
    pub ledger_state: Arc<LedgerState>,
}

impl SynchronizationEvent {
    pub fn new(
        sync_outcome: SynchronizationOutcomeType,
        round: Round,
        ledger_state: Arc<LedgerState>,
    ) -> Self {
        Self {
            sync_outcome,
            round,
            ledger_state,
        }
    }
}
