//! Block download abstraction.

use std::sync::Arc;

use futures_util::stream::BoxStream;

use quorum_types::{Block, PublicKey};

/// Blocks streamed from one peer, in ascending height order.
///
/// Lazy (nothing is requested until first poll), finite and not
/// restartable. A transport failure ends the stream early, possibly empty.
pub type BlockStream = BoxStream<'static, Arc<Block>>;

/// Downloads chains of blocks from remote peers.
pub trait BlockLoader: Send + Sync {
    /// Stream the blocks `peer` holds above `height`.
    fn retrieve_blocks(&self, height: u64, peer: &PublicKey) -> BlockStream;
}
