use thiserror::Error;

use quorum_store::StoreError;
use quorum_types::PublicKey;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("block at height {actual} does not follow top height {top}")]
    UnexpectedHeight { top: u64, actual: u64 },

    #[error("block {height} does not link to the ledger top")]
    BrokenLink { height: u64 },

    #[error("block {height} hash does not match its contents")]
    HashMismatch { height: u64 },

    #[error("block {height} carries an invalid signature from {signer}")]
    InvalidSignature { height: u64, signer: PublicKey },

    #[error("block {height} is signed by {signer}, which is not a ledger peer")]
    UnknownSigner { height: u64, signer: PublicKey },

    #[error("block {height} has {signatures} peer signatures out of {peers}, no supermajority")]
    NoSupermajority { height: u64, signatures: usize, peers: usize },

    #[error("no peer supplied the chain up to height {target}, stopped at {reached}")]
    PeersExhausted { target: u64, reached: u64 },

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
