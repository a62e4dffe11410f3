use thiserror::Error;

use quorum_store::StoreError;

#[derive(Debug, Error)]
pub enum NetworkError {
    /// The other end of a request or reply channel is gone.
    #[error("channel closed")]
    ChannelClosed,

    #[error("peer {0} not found")]
    PeerNotFound(String),

    #[error("block source error: {0}")]
    Store(#[from] StoreError),
}
