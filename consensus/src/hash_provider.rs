//! Mapping between proposal events and voted hashes.

use quorum_types::Hash;

use crate::block_creator::BlockCreatorEvent;
use crate::vote::{RoundHash, VoteHashes};

/// Converts between block proposal events, voted hashes and block hashes.
pub trait HashProvider: Send + Sync {
    /// The hash this node votes for given a proposal event.
    fn make_hash(&self, event: &BlockCreatorEvent) -> RoundHash;

    /// The canonical block hash a voted hash refers to.
    fn to_model_hash(&self, hash: &RoundHash) -> Hash;
}

/// Votes for `(proposal hash, block hash)` and carries the block's first
/// signature as the voter's block signature.
#[derive(Debug, Default)]
pub struct DefaultHashProvider;

impl HashProvider for DefaultHashProvider {
    fn make_hash(&self, event: &BlockCreatorEvent) -> RoundHash {
        match &event.round_data {
            None => RoundHash::new(event.round, VoteHashes::default()),
            Some(data) => {
                let hash = RoundHash::new(
                    event.round,
                    VoteHashes::new(data.proposal_hash, data.block.hash),
                );
                match data.block.signatures.first() {
                    Some(sig) => hash.with_block_signature(*sig),
                    None => hash,
                }
            }
        }
    }

    fn to_model_hash(&self, hash: &RoundHash) -> Hash {
        hash.vote_hashes.block_hash
    }
}
