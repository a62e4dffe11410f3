//! Transaction factory and commit paths.

use std::sync::Arc;

use quorum_types::{Block, LedgerState};

use crate::{MutableStorage, StoreError};

/// Result of committing blocks: the new ledger snapshot.
pub type CommitResult = Result<Arc<LedgerState>, StoreError>;

/// Opens ledger transactions and commits them.
pub trait MutableFactory: Send + Sync {
    type Storage: MutableStorage + 'static;

    /// Snapshot of the committed ledger, without opening a transaction.
    fn committed_ledger_state(&self) -> Result<Arc<LedgerState>, StoreError>;

    /// Open a fresh transaction on top of the committed ledger.
    fn create_mutable_storage(&self) -> Result<Self::Storage, StoreError>;

    /// Commit an open transaction, producing the new ledger state.
    fn commit(&self, storage: Self::Storage) -> CommitResult;

    /// Whether a block has been prepared ahead of the vote (two-phase commit).
    fn prepared_commit_enabled(&self) -> bool;

    /// Finalize the prepared transaction for `block`.
    ///
    /// Fails when nothing is prepared or the prepared state belongs to a
    /// different block; the caller then falls back to apply-and-commit.
    fn commit_prepared(&self, block: &Arc<Block>) -> CommitResult;
}
