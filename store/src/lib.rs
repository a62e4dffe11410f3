//! Abstract ledger storage traits.
//!
//! The synchronizer only ever touches the ledger through these traits: a
//! [`MutableFactory`] opens [`MutableStorage`] transactions, blocks are applied
//! to the open transaction, and the factory commits it to produce a new
//! [`LedgerState`](quorum_types::LedgerState). Storage backends (and the
//! in-memory nullables used in tests) implement them.

pub mod block_query;
pub mod error;
pub mod mutable_factory;
pub mod mutable_storage;

pub use block_query::BlockQuery;
pub use error::StoreError;
pub use mutable_factory::{CommitResult, MutableFactory};
pub use mutable_storage::MutableStorage;
