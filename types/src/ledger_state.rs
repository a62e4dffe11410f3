//! Immutable snapshots of the committed ledger.

use serde::{Deserialize, Serialize};

use crate::{Hash, Peer, PublicKey};

/// Height and hash of the top committed block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopBlockInfo {
    pub height: u64,
    pub top_hash: Hash,
}

impl TopBlockInfo {
    pub fn new(height: u64, top_hash: Hash) -> Self {
        Self { height, top_hash }
    }
}

/// The ledger as of one commit: its peer set and its top block.
///
/// A new `LedgerState` is produced by every successful commit; existing
/// snapshots are never mutated. Components share them as
/// `Arc<LedgerState>`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    /// Ordered set of peers known to the ledger.
    pub ledger_peers: Vec<Peer>,
    pub top_block_info: TopBlockInfo,
}

impl LedgerState {
    pub fn new(ledger_peers: Vec<Peer>, height: u64, top_hash: Hash) -> Self {
        Self {
            ledger_peers,
            top_block_info: TopBlockInfo::new(height, top_hash),
        }
    }

    pub fn height(&self) -> u64 {
        self.top_block_info.height
    }

    pub fn top_hash(&self) -> Hash {
        self.top_block_info.top_hash
    }

    /// Whether `key` belongs to one of the ledger peers.
    pub fn has_peer(&self, key: &PublicKey) -> bool {
        self.ledger_peers.iter().any(|p| &p.public_key == key)
    }
}
