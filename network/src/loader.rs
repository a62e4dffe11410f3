//! Channel-backed block loader.
//!
//! [`ChannelBlockLoader`] is the client used by the synchronizer. The
//! companion [`BlockLoaderHandle`] goes to the transport, which reads
//! [`BlockRequest`]s from it and answers each one on the request's own reply
//! channel.

use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use tokio::sync::mpsc;

use quorum_types::{Block, PublicKey};

use crate::block_loader::{BlockLoader, BlockStream};
use crate::NetworkError;

/// Default capacity of the request channel.
pub const DEFAULT_REQUEST_CAPACITY: usize = 64;
/// Blocks buffered per reply before the server waits for the reader.
const REPLY_BUFFER: usize = 16;

/// A request for the blocks `peer` holds above `height`.
#[derive(Debug)]
pub struct BlockRequest {
    pub peer: PublicKey,
    pub height: u64,
    reply: mpsc::Sender<Arc<Block>>,
}

impl BlockRequest {
    /// Send the next block of the answer.
    ///
    /// Fails with [`NetworkError::ChannelClosed`] once the requester has
    /// dropped its stream.
    pub async fn respond(&self, block: Arc<Block>) -> Result<(), NetworkError> {
        self.reply
            .send(block)
            .await
            .map_err(|_| NetworkError::ChannelClosed)
    }
}

/// Block loader client.
#[derive(Clone)]
pub struct ChannelBlockLoader {
    request_tx: mpsc::Sender<BlockRequest>,
}

/// Handle given to the transport to serve block requests.
pub struct BlockLoaderHandle {
    pub request_rx: mpsc::Receiver<BlockRequest>,
}

impl ChannelBlockLoader {
    /// Create a loader and its companion [`BlockLoaderHandle`].
    pub fn new(capacity: usize) -> (Self, BlockLoaderHandle) {
        let (request_tx, request_rx) = mpsc::channel(capacity);
        (Self { request_tx }, BlockLoaderHandle { request_rx })
    }
}

enum Fetch {
    Pending {
        request_tx: mpsc::Sender<BlockRequest>,
        peer: PublicKey,
        height: u64,
    },
    Receiving(mpsc::Receiver<Arc<Block>>),
}

impl BlockLoader for ChannelBlockLoader {
    fn retrieve_blocks(&self, height: u64, peer: &PublicKey) -> BlockStream {
        let start = Fetch::Pending {
            request_tx: self.request_tx.clone(),
            peer: *peer,
            height,
        };
        stream::unfold(start, |state| async move {
            let mut reply_rx = match state {
                Fetch::Pending {
                    request_tx,
                    peer,
                    height,
                } => {
                    let (reply, reply_rx) = mpsc::channel(REPLY_BUFFER);
                    let request = BlockRequest {
                        peer,
                        height,
                        reply,
                    };
                    if request_tx.send(request).await.is_err() {
                        tracing::warn!(%peer, "block loader transport is gone");
                        return None;
                    }
                    tracing::debug!(%peer, height, "requested blocks");
                    reply_rx
                }
                Fetch::Receiving(reply_rx) => reply_rx,
            };
            let block = reply_rx.recv().await?;
            Some((block, Fetch::Receiving(reply_rx)))
        })
        .boxed()
    }
}
