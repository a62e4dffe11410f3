//! Read access to committed blocks.

use std::sync::Arc;

use quorum_types::{Block, TopBlockInfo};

use crate::StoreError;

/// Query interface over the committed chain.
pub trait BlockQuery: Send + Sync {
    /// Height and hash of the top committed block.
    fn top_block_info(&self) -> Result<TopBlockInfo, StoreError>;

    /// Committed block at `height`, if any.
    fn get_block(&self, height: u64) -> Result<Option<Arc<Block>>, StoreError>;
}
