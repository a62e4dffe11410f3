//! Nullable infrastructure for deterministic testing.
//!
//! Every external collaborator of the commit layer (ledger storage, block
//! download, the voting protocol) sits behind a trait. This crate provides
//! test-friendly implementations that:
//! - Behave deterministically
//! - Can be scripted and inspected programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod chain;
pub mod hash_gate;
pub mod network;
pub mod store;

pub use chain::{keypairs, peers_for, signed_chain};
pub use hash_gate::{CastVote, NullHashGate};
pub use network::NullBlockLoader;
pub use store::{NullMutableStorage, NullStorage};
