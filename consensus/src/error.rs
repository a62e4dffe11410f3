use thiserror::Error;

use quorum_types::Round;

#[derive(Debug, Error)]
pub enum ConsensusError {
    /// An outcome carried no votes.
    #[error("outcome carries no votes")]
    EmptyOutcome,

    /// Votes inside one outcome disagree on the round. The voting layer
    /// guarantees this never happens, so it is treated as unrecoverable.
    #[error("malformed outcome: votes for round {expected} and {found}")]
    MalformedOutcome { expected: Round, found: Round },

    /// The gate service is no longer running.
    #[error("consensus gate channel closed")]
    ChannelClosed,
}
