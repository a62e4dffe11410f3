//! Single-slot cache of the block this node last voted for.

use std::sync::Arc;

use quorum_types::Block;

/// Holds at most one block: the one the local node voted for in the round
/// currently being decided.
///
/// Owned by the consensus outcome gate. Readers get a snapshot via
/// [`get`](Self::get), never a live reference.
#[derive(Debug, Default)]
pub struct ConsensusResultCache {
    block: Option<Arc<Block>>,
}

impl ConsensusResultCache {
    pub fn new() -> Self {
        Self { block: None }
    }

    /// Store `block`, replacing any previous entry.
    pub fn insert(&mut self, block: Arc<Block>) {
        self.block = Some(block);
    }

    pub fn get(&self) -> Option<Arc<Block>> {
        self.block.clone()
    }

    /// Drop the cached block, if any.
    pub fn release(&mut self) {
        self.block = None;
    }

    pub fn is_empty(&self) -> bool {
        self.block.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_types::Hash;

    #[test]
    fn insert_replaces_previous_entry() {
        let mut cache = ConsensusResultCache::new();
        let first = Arc::new(Block::new(1, Hash::ZERO, 0, vec![1]));
        let second = Arc::new(Block::new(1, Hash::ZERO, 0, vec![2]));

        cache.insert(first);
        cache.insert(Arc::clone(&second));
        assert_eq!(cache.get(), Some(second));
    }

    #[test]
    fn release_empties_the_slot() {
        let mut cache = ConsensusResultCache::new();
        assert!(cache.is_empty());
        cache.insert(Arc::new(Block::new(1, Hash::ZERO, 0, Vec::new())));
        assert!(!cache.is_empty());
        cache.release();
        assert!(cache.is_empty());
        assert_eq!(cache.get(), None);
    }
}
