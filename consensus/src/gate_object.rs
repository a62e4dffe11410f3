//! Decisions published by the consensus outcome gate.

use std::sync::Arc;

use quorum_types::{Block, Hash, LedgerState, PublicKey, Round};

/// The synchronizer-facing decision derived from one [`Outcome`](crate::Outcome).
///
/// `ledger_state` is always the gate's ledger state as of its last vote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateObject {
    /// The local vote matches the committed result.
    PairValid {
        round: Round,
        ledger_state: Arc<LedgerState>,
        block: Arc<Block>,
    },
    /// The committed block differs from the local vote.
    VoteOther {
        round: Round,
        ledger_state: Arc<LedgerState>,
        signers: Vec<PublicKey>,
        block_hash: Hash,
    },
    /// The round committed nothing.
    AgreementOnNone {
        round: Round,
        ledger_state: Arc<LedgerState>,
        signers: Vec<PublicKey>,
    },
    /// Peers agreed on the proposal but split on the resulting block.
    BlockReject {
        round: Round,
        ledger_state: Arc<LedgerState>,
        signers: Vec<PublicKey>,
    },
    /// Peers never agreed on a proposal.
    ProposalReject {
        round: Round,
        ledger_state: Arc<LedgerState>,
        signers: Vec<PublicKey>,
    },
    /// A round strictly ahead of the local one was observed.
    Future {
        round: Round,
        ledger_state: Arc<LedgerState>,
        signers: Vec<PublicKey>,
    },
}

impl GateObject {
    pub fn round(&self) -> Round {
        match self {
            Self::PairValid { round, .. }
            | Self::VoteOther { round, .. }
            | Self::AgreementOnNone { round, .. }
            | Self::BlockReject { round, .. }
            | Self::ProposalReject { round, .. }
            | Self::Future { round, .. } => *round,
        }
    }

    pub fn ledger_state(&self) -> &Arc<LedgerState> {
        match self {
            Self::PairValid { ledger_state, .. }
            | Self::VoteOther { ledger_state, .. }
            | Self::AgreementOnNone { ledger_state, .. }
            | Self::BlockReject { ledger_state, .. }
            | Self::ProposalReject { ledger_state, .. }
            | Self::Future { ledger_state, .. } => ledger_state,
        }
    }

    /// Short variant name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PairValid { .. } => "pair_valid",
            Self::VoteOther { .. } => "vote_other",
            Self::AgreementOnNone { .. } => "agreement_on_none",
            Self::BlockReject { .. } => "block_reject",
            Self::ProposalReject { .. } => "proposal_reject",
            Self::Future { .. } => "future",
        }
    }
}
