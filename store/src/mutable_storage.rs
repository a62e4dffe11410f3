//! Open ledger transactions.

use std::sync::Arc;

use quorum_types::{Block, LedgerState};

use crate::StoreError;

/// A ledger transaction that blocks are applied to before commit.
///
/// Created by [`MutableFactory::create_mutable_storage`](crate::MutableFactory)
/// seeded with the committed top; every successful [`apply`](Self::apply)
/// advances [`ledger_state`](Self::ledger_state). Dropping an uncommitted
/// storage rolls it back.
pub trait MutableStorage: Send {
    /// Apply one block on top of the current transaction state.
    ///
    /// A failed apply leaves the transaction exactly as it was before the
    /// call; blocks applied earlier stay applied.
    fn apply(&mut self, block: Arc<Block>) -> Result<(), StoreError>;

    /// Ledger state including every block applied so far.
    fn ledger_state(&self) -> Arc<LedgerState>;
}
