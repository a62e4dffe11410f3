//! Nullable ledger storage: an in-memory chain with scriptable failures.

use std::sync::{Arc, Mutex, MutexGuard};

use quorum_store::{BlockQuery, CommitResult, MutableFactory, MutableStorage, StoreError};
use quorum_types::{Block, Hash, LedgerState, Peer, TopBlockInfo};

/// An in-memory committed chain plus the transactions opened on it.
///
/// Clones share the same chain. Thread-safe for use with tokio's
/// multi-threaded runtime.
#[derive(Clone)]
pub struct NullStorage {
    inner: Arc<Mutex<Chain>>,
}

struct Chain {
    peers: Vec<Peer>,
    genesis_hash: Hash,
    /// Committed blocks; index `i` holds height `i + 1`.
    blocks: Vec<Arc<Block>>,
    prepared_enabled: bool,
    prepared: Option<Hash>,
    fail_next_commit: bool,
    fail_apply_at: Option<u64>,
    storages_created: usize,
    commits: usize,
    prepared_commits: usize,
}

impl Chain {
    fn ledger_state(&self) -> Arc<LedgerState> {
        let (height, top_hash) = match self.blocks.last() {
            Some(block) => (block.height, block.hash),
            None => (0, self.genesis_hash),
        };
        Arc::new(LedgerState::new(self.peers.clone(), height, top_hash))
    }
}

impl NullStorage {
    /// An empty chain (height 0, top hash [`Hash::ZERO`]) over `peers`.
    pub fn new(peers: Vec<Peer>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Chain {
                peers,
                genesis_hash: Hash::ZERO,
                blocks: Vec::new(),
                prepared_enabled: false,
                prepared: None,
                fail_next_commit: false,
                fail_apply_at: None,
                storages_created: 0,
                commits: 0,
                prepared_commits: 0,
            })),
        }
    }

    /// A chain already holding `blocks`, which must start at height 1.
    pub fn with_blocks(peers: Vec<Peer>, blocks: Vec<Arc<Block>>) -> Self {
        let storage = Self::new(peers);
        storage.lock().blocks = blocks;
        storage
    }

    fn lock(&self) -> MutexGuard<'_, Chain> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn ledger_state(&self) -> Arc<LedgerState> {
        self.lock().ledger_state()
    }

    pub fn height(&self) -> u64 {
        self.lock().blocks.len() as u64
    }

    pub fn blocks(&self) -> Vec<Arc<Block>> {
        self.lock().blocks.clone()
    }

    /// Prepare `block` for a two-phase commit and enable the prepared path.
    pub fn prepare(&self, block: &Block) {
        let mut chain = self.lock();
        chain.prepared_enabled = true;
        chain.prepared = Some(block.hash);
    }

    /// Make the next [`MutableFactory::commit`] fail.
    pub fn fail_next_commit(&self) {
        self.lock().fail_next_commit = true;
    }

    /// Make every apply of a block at `height` fail.
    pub fn fail_apply_at(&self, height: u64) {
        self.lock().fail_apply_at = Some(height);
    }

    /// Number of transactions opened so far.
    pub fn storages_created(&self) -> usize {
        self.lock().storages_created
    }

    /// Number of successful generic commits.
    pub fn commits(&self) -> usize {
        self.lock().commits
    }

    /// Number of successful prepared commits.
    pub fn prepared_commits(&self) -> usize {
        self.lock().prepared_commits
    }
}

/// A transaction over a [`NullStorage`] chain.
pub struct NullMutableStorage {
    base_height: u64,
    state: Arc<LedgerState>,
    pending: Vec<Arc<Block>>,
    fail_apply_at: Option<u64>,
}

impl NullMutableStorage {
    /// Blocks applied but not yet committed.
    pub fn pending(&self) -> &[Arc<Block>] {
        &self.pending
    }
}

impl MutableStorage for NullMutableStorage {
    fn apply(&mut self, block: Arc<Block>) -> Result<(), StoreError> {
        let top = self.state.top_block_info;
        if block.height != top.height + 1 {
            return Err(StoreError::HeightMismatch {
                height: block.height,
                top: top.height,
            });
        }
        if block.prev_hash != top.top_hash || self.fail_apply_at == Some(block.height) {
            return Err(StoreError::ApplyFailed(block.hash.to_string()));
        }
        self.state = Arc::new(LedgerState {
            ledger_peers: self.state.ledger_peers.clone(),
            top_block_info: TopBlockInfo::new(block.height, block.hash),
        });
        self.pending.push(block);
        Ok(())
    }

    fn ledger_state(&self) -> Arc<LedgerState> {
        Arc::clone(&self.state)
    }
}

impl MutableFactory for NullStorage {
    type Storage = NullMutableStorage;

    fn committed_ledger_state(&self) -> Result<Arc<LedgerState>, StoreError> {
        Ok(self.lock().ledger_state())
    }

    fn create_mutable_storage(&self) -> Result<NullMutableStorage, StoreError> {
        let mut chain = self.lock();
        chain.storages_created += 1;
        let state = chain.ledger_state();
        Ok(NullMutableStorage {
            base_height: state.height(),
            state,
            pending: Vec::new(),
            fail_apply_at: chain.fail_apply_at,
        })
    }

    fn commit(&self, storage: NullMutableStorage) -> CommitResult {
        let mut chain = self.lock();
        if storage.pending.is_empty() {
            return Err(StoreError::NothingApplied);
        }
        if std::mem::take(&mut chain.fail_next_commit) {
            return Err(StoreError::CommitFailed("injected failure".into()));
        }
        if storage.base_height != chain.blocks.len() as u64 {
            return Err(StoreError::CommitFailed(format!(
                "transaction opened at height {} but chain is at {}",
                storage.base_height,
                chain.blocks.len()
            )));
        }
        chain.blocks.extend(storage.pending);
        chain.prepared = None;
        chain.commits += 1;
        Ok(chain.ledger_state())
    }

    fn prepared_commit_enabled(&self) -> bool {
        self.lock().prepared_enabled
    }

    fn commit_prepared(&self, block: &Arc<Block>) -> CommitResult {
        let mut chain = self.lock();
        match chain.prepared {
            Some(hash) if hash == block.hash => {}
            _ => return Err(StoreError::NotPrepared(block.hash.to_string())),
        }
        if block.height != chain.blocks.len() as u64 + 1 {
            return Err(StoreError::HeightMismatch {
                height: block.height,
                top: chain.blocks.len() as u64,
            });
        }
        chain.blocks.push(Arc::clone(block));
        chain.prepared = None;
        chain.prepared_commits += 1;
        Ok(chain.ledger_state())
    }
}

impl BlockQuery for NullStorage {
    fn top_block_info(&self) -> Result<TopBlockInfo, StoreError> {
        Ok(self.lock().ledger_state().top_block_info)
    }

    fn get_block(&self, height: u64) -> Result<Option<Arc<Block>>, StoreError> {
        let chain = self.lock();
        Ok(height
            .checked_sub(1)
            .and_then(|i| chain.blocks.get(i as usize))
            .cloned())
    }
}
