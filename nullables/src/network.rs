//! Nullable block loader: scripted per-peer answers, recorded requests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use futures_util::stream::{self, StreamExt};

use quorum_network::{BlockLoader, BlockStream};
use quorum_types::{Block, PublicKey};

/// A block loader that answers from scripted data instead of the network.
///
/// Each peer either serves a whole chain (every block above the requested
/// height) or replays a queue of fixed responses, one per request. Peers
/// with no script answer with an empty stream.
#[derive(Default)]
pub struct NullBlockLoader {
    inner: Mutex<Scripts>,
}

#[derive(Default)]
struct Scripts {
    chains: HashMap<PublicKey, Vec<Arc<Block>>>,
    responses: HashMap<PublicKey, VecDeque<Vec<Arc<Block>>>>,
    requests: Vec<(PublicKey, u64)>,
}

impl NullBlockLoader {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Scripts> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Let `peer` serve `blocks` as its chain.
    pub fn serve_chain(&self, peer: PublicKey, blocks: Vec<Arc<Block>>) {
        self.lock().chains.insert(peer, blocks);
    }

    /// Queue one fixed response for the next request addressed to `peer`.
    pub fn push_response(&self, peer: PublicKey, blocks: Vec<Arc<Block>>) {
        self.lock().responses.entry(peer).or_default().push_back(blocks);
    }

    /// Every `(peer, height)` requested so far, in order.
    pub fn requests(&self) -> Vec<(PublicKey, u64)> {
        self.lock().requests.clone()
    }
}

impl BlockLoader for NullBlockLoader {
    fn retrieve_blocks(&self, height: u64, peer: &PublicKey) -> BlockStream {
        let mut scripts = self.lock();
        scripts.requests.push((*peer, height));

        let queued = scripts.responses.get_mut(peer).and_then(VecDeque::pop_front);
        let blocks = match queued {
            Some(blocks) => blocks,
            None => scripts
                .chains
                .get(peer)
                .map(|chain| chain.iter().filter(|b| b.height > height).cloned().collect())
                .unwrap_or_default(),
        };
        stream::iter(blocks).boxed()
    }
}
