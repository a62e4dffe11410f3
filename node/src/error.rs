use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("consensus error: {0}")]
    Consensus(#[from] quorum_consensus::ConsensusError),

    #[error("store error: {0}")]
    Store(#[from] quorum_store::StoreError),

    #[error("config error: {0}")]
    Config(String),

    #[error("logging error: {0}")]
    Logging(String),

    #[error("cannot listen for shutdown signals: {0}")]
    Signal(String),

    #[error("{0} task failed: {1}")]
    TaskFailed(&'static str, String),
}
