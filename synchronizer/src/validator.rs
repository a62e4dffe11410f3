//! Validation of downloaded chains.

use std::collections::BTreeSet;

use futures_util::future::BoxFuture;
use futures_util::{FutureExt, StreamExt};

use quorum_consensus::SupermajorityChecker;
use quorum_crypto::verify_block_signature;
use quorum_network::BlockStream;
use quorum_store::MutableStorage;
use quorum_types::{Block, LedgerState};

use crate::SyncError;

/// Validates a streamed chain block by block, applying each valid block to
/// the open transaction as it arrives.
pub trait ChainValidator: Send + Sync {
    /// `true` when every streamed block was valid and applied. On `false`
    /// the blocks applied before the failure stay applied.
    fn validate_and_apply<'a>(
        &'a self,
        blocks: BlockStream,
        storage: &'a mut dyn MutableStorage,
    ) -> BoxFuture<'a, bool>;
}

/// Checks linkage, hashes and quorum signatures against the transaction's
/// current ledger state.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChainValidatorImpl {
    checker: SupermajorityChecker,
}

impl ChainValidatorImpl {
    pub fn new(checker: SupermajorityChecker) -> Self {
        Self { checker }
    }

    /// Validate a single block on top of `ledger`.
    pub fn validate_block(&self, block: &Block, ledger: &LedgerState) -> Result<(), SyncError> {
        let top = ledger.top_block_info;
        if block.height != top.height + 1 {
            return Err(SyncError::UnexpectedHeight {
                top: top.height,
                actual: block.height,
            });
        }
        if block.prev_hash != top.top_hash {
            return Err(SyncError::BrokenLink { height: block.height });
        }
        if block.hash != block.compute_hash() {
            return Err(SyncError::HashMismatch { height: block.height });
        }

        let mut signers = BTreeSet::new();
        for sig in &block.signatures {
            if !ledger.has_peer(&sig.public_key) {
                return Err(SyncError::UnknownSigner {
                    height: block.height,
                    signer: sig.public_key,
                });
            }
            if !verify_block_signature(block, sig) {
                return Err(SyncError::InvalidSignature {
                    height: block.height,
                    signer: sig.public_key,
                });
            }
            signers.insert(sig.public_key);
        }

        let peers = ledger.ledger_peers.len();
        if !self.checker.has_supermajority(signers.len(), peers) {
            return Err(SyncError::NoSupermajority {
                height: block.height,
                signatures: signers.len(),
                peers,
            });
        }
        Ok(())
    }

    async fn apply_chain(&self, mut blocks: BlockStream, storage: &mut dyn MutableStorage) -> bool {
        while let Some(block) = blocks.next().await {
            let ledger = storage.ledger_state();
            if let Err(e) = self.validate_block(&block, &ledger) {
                tracing::warn!(height = block.height, error = %e, "downloaded block rejected");
                return false;
            }
            let height = block.height;
            if let Err(e) = storage.apply(block) {
                tracing::warn!(height, error = %e, "downloaded block failed to apply");
                return false;
            }
            tracing::trace!(height, "downloaded block applied");
        }
        true
    }
}

impl ChainValidator for ChainValidatorImpl {
    fn validate_and_apply<'a>(
        &'a self,
        blocks: BlockStream,
        storage: &'a mut dyn MutableStorage,
    ) -> BoxFuture<'a, bool> {
        self.apply_chain(blocks, storage).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use quorum_consensus::ConsistencyModel;
    use quorum_crypto::{keypair_from_seed, sign_block};
    use quorum_store::StoreError;
    use quorum_types::{BlockSignature, Hash, KeyPair, Peer, Signature};
    use std::sync::Arc;

    struct VecStorage {
        state: Arc<LedgerState>,
        applied: Vec<Arc<Block>>,
    }

    impl MutableStorage for VecStorage {
        fn apply(&mut self, block: Arc<Block>) -> Result<(), StoreError> {
            self.state = Arc::new(LedgerState::new(
                self.state.ledger_peers.clone(),
                block.height,
                block.hash,
            ));
            self.applied.push(block);
            Ok(())
        }

        fn ledger_state(&self) -> Arc<LedgerState> {
            Arc::clone(&self.state)
        }
    }

    fn keys(n: u8) -> Vec<KeyPair> {
        (1..=n).map(|i| keypair_from_seed(&[i; 32])).collect()
    }

    fn ledger(keys: &[KeyPair]) -> Arc<LedgerState> {
        let peers = keys
            .iter()
            .map(|k| Peer::new("127.0.0.1:10001", k.public))
            .collect();
        Arc::new(LedgerState::new(peers, 0, Hash::ZERO))
    }

    fn chain(count: u64, signers: &[KeyPair]) -> Vec<Arc<Block>> {
        let mut prev = Hash::ZERO;
        (1..=count)
            .map(|h| {
                let mut block = Block::new(h, prev, h, vec![h as u8]);
                for kp in signers {
                    block.add_signature(sign_block(&block, kp));
                }
                prev = block.hash;
                Arc::new(block)
            })
            .collect()
    }

    fn validator() -> ChainValidatorImpl {
        ChainValidatorImpl::new(SupermajorityChecker::new(ConsistencyModel::Bft))
    }

    #[tokio::test]
    async fn valid_chain_is_applied() {
        let keys = keys(4);
        let mut storage = VecStorage {
            state: ledger(&keys),
            applied: Vec::new(),
        };
        let blocks = chain(3, &keys[..3]);

        let ok = validator()
            .validate_and_apply(stream::iter(blocks).boxed(), &mut storage)
            .await;
        assert!(ok);
        assert_eq!(storage.applied.len(), 3);
        assert_eq!(storage.state.height(), 3);
    }

    #[tokio::test]
    async fn broken_link_stops_after_prefix() {
        let keys = keys(4);
        let mut storage = VecStorage {
            state: ledger(&keys),
            applied: Vec::new(),
        };
        let mut blocks = chain(3, &keys);
        blocks.remove(1);

        let ok = validator()
            .validate_and_apply(stream::iter(blocks).boxed(), &mut storage)
            .await;
        assert!(!ok);
        assert_eq!(storage.applied.len(), 1);
    }

    #[test]
    fn too_few_signatures_is_rejected() {
        let keys = keys(4);
        let block = &chain(1, &keys[..2])[0];
        assert!(matches!(
            validator().validate_block(block, &ledger(&keys)),
            Err(SyncError::NoSupermajority { signatures: 2, peers: 4, .. })
        ));
    }

    #[test]
    fn signer_outside_ledger_is_rejected() {
        let keys = keys(5);
        let block = &chain(1, &keys)[0];
        assert!(matches!(
            validator().validate_block(block, &ledger(&keys[..4])),
            Err(SyncError::UnknownSigner { .. })
        ));
    }

    #[test]
    fn forged_signature_is_rejected() {
        let keys = keys(4);
        let mut block = (*chain(1, &keys[..2])[0]).clone();
        block.add_signature(BlockSignature::new(keys[3].public, Signature([7; 64])));
        block.add_signature(sign_block(&block, &keys[2]));
        assert!(matches!(
            validator().validate_block(&block, &ledger(&keys)),
            Err(SyncError::InvalidSignature { .. })
        ));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let keys = keys(4);
        let mut block = (*chain(1, &keys)[0]).clone();
        block.payload.push(0xFF);
        assert!(matches!(
            validator().validate_block(&block, &ledger(&keys)),
            Err(SyncError::HashMismatch { height: 1 })
        ));
    }
}
