use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("block at height {height} does not extend top height {top}")]
    HeightMismatch { height: u64, top: u64 },

    #[error("block {0} was rejected by the backend")]
    ApplyFailed(String),

    #[error("commit failed: {0}")]
    CommitFailed(String),

    #[error("nothing was applied to the mutable storage")]
    NothingApplied,

    #[error("no prepared block: {0}")]
    NotPrepared(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}
