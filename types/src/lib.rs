//! Fundamental types for the quorum commit layer.
//!
//! This crate defines the value types shared across every other crate in the
//! workspace: hashes, rounds, keys and signatures, blocks, peers and ledger
//! state snapshots.

pub mod block;
pub mod error;
pub mod hash;
pub mod keys;
pub mod ledger_state;
pub mod peer;
pub mod round;

pub use block::{Block, BlockSignature};
pub use error::TypesError;
pub use hash::Hash;
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use ledger_state::{LedgerState, TopBlockInfo};
pub use peer::Peer;
pub use round::Round;
