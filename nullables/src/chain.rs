//! Deterministic keys and signed chains for tests.

use std::sync::Arc;

use quorum_crypto::{keypair_from_seed, sign_block};
use quorum_types::{Block, Hash, KeyPair, Peer};

/// `n` keypairs derived from fixed seeds `[1; 32]`, `[2; 32]`, ...
pub fn keypairs(n: u8) -> Vec<KeyPair> {
    (1..=n).map(|i| keypair_from_seed(&[i; 32])).collect()
}

/// Ledger peers for `keys`, with loopback addresses.
pub fn peers_for(keys: &[KeyPair]) -> Vec<Peer> {
    keys.iter()
        .enumerate()
        .map(|(i, kp)| Peer::new(format!("127.0.0.1:{}", 10001 + i), kp.public))
        .collect()
}

/// `count` blocks on top of `(top_height, top_hash)`, each signed by every
/// key in `signers`.
pub fn signed_chain(
    top_height: u64,
    top_hash: Hash,
    count: u64,
    signers: &[KeyPair],
) -> Vec<Arc<Block>> {
    let mut prev_hash = top_hash;
    (top_height + 1..=top_height + count)
        .map(|height| {
            let payload = height.to_le_bytes().to_vec();
            let mut block = Block::new(height, prev_hash, height * 1_000, payload);
            for kp in signers {
                let sig = sign_block(&block, kp);
                block.add_signature(sig);
            }
            prev_hash = block.hash;
            Arc::new(block)
        })
        .collect()
}
