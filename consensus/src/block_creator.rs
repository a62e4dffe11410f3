//! Events from the block proposal source.

use std::sync::Arc;

use quorum_types::{Block, Hash, LedgerState, Round};

/// The proposal and the block built from it for one round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundData {
    pub proposal_hash: Hash,
    pub block: Arc<Block>,
}

/// A round the local node is ready to vote in.
///
/// `round_data` is `None` when there was nothing to propose; the node then
/// votes for nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockCreatorEvent {
    pub round: Round,
    pub ledger_state: Arc<LedgerState>,
    pub round_data: Option<RoundData>,
}

impl BlockCreatorEvent {
    pub fn new(
        round: Round,
        ledger_state: Arc<LedgerState>,
        round_data: Option<RoundData>,
    ) -> Self {
        Self {
            round,
            ledger_state,
            round_data,
        }
    }
}
