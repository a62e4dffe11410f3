//! In-process block server.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::broadcast;

use quorum_store::BlockQuery;
use quorum_types::PublicKey;

use crate::loader::{BlockLoaderHandle, BlockRequest};
use crate::NetworkError;

/// Answer block requests from the chains in `peers` until shutdown or until
/// every loader is dropped.
///
/// Each request is answered on its own task with heights `height + 1 ..= top`
/// of the addressed peer's chain. Requests for unknown peers get an empty
/// stream.
pub async fn serve_block_requests(
    mut handle: BlockLoaderHandle,
    peers: HashMap<PublicKey, Arc<dyn BlockQuery>>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        let request = tokio::select! {
            biased;
            _ = shutdown.recv() => {
                tracing::info!("block server shutting down");
                break;
            }
            request = handle.request_rx.recv() => match request {
                Some(request) => request,
                None => break,
            },
        };

        let source = peers.get(&request.peer).cloned();
        tokio::spawn(async move {
            let peer = request.peer;
            match serve_one(&request, source).await {
                Ok(sent) => tracing::debug!(%peer, sent, "block request served"),
                Err(NetworkError::ChannelClosed) => {
                    tracing::debug!(%peer, "requester dropped the block stream")
                }
                Err(e) => tracing::warn!(%peer, error = %e, "block request failed"),
            }
        });
    }
}

async fn serve_one(
    request: &BlockRequest,
    source: Option<Arc<dyn BlockQuery>>,
) -> Result<usize, NetworkError> {
    let source = source.ok_or_else(|| NetworkError::PeerNotFound(request.peer.to_string()))?;
    let top = source.top_block_info()?.height;
    let mut sent = 0;
    for height in request.height + 1..=top {
        match source.get_block(height)? {
            Some(block) => {
                request.respond(block).await?;
                sent += 1;
            }
            None => break,
        }
    }
    Ok(sent)
}
