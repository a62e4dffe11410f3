//! Blocks of the linear chain and their quorum signatures.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};

use crate::{Hash, PublicKey, Signature};

type Blake2b256 = Blake2b<U32>;

/// A peer's signature over a block hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSignature {
    pub public_key: PublicKey,
    pub signed_data: Signature,
}

impl BlockSignature {
    pub fn new(public_key: PublicKey, signed_data: Signature) -> Self {
        Self {
            public_key,
            signed_data,
        }
    }
}

/// A block at a given height of the chain.
///
/// `hash` covers the height, the previous hash, the creation time and the
/// payload. Signatures are collected after the block is created and are not
/// part of the hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub height: u64,
    pub prev_hash: Hash,
    /// Creation time, milliseconds since the Unix epoch.
    pub created_time: u64,
    /// Opaque ordered transactions.
    pub payload: Vec<u8>,
    pub hash: Hash,
    pub signatures: Vec<BlockSignature>,
}

impl Block {
    /// Build an unsigned block with its hash filled in.
    pub fn new(height: u64, prev_hash: Hash, created_time: u64, payload: Vec<u8>) -> Self {
        let mut block = Self {
            height,
            prev_hash,
            created_time,
            payload,
            hash: Hash::ZERO,
            signatures: Vec::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// Blake2b-256 over `height ‖ prev_hash ‖ created_time ‖ len(payload) ‖ payload`,
    /// integers little-endian.
    pub fn compute_hash(&self) -> Hash {
        let mut hasher = Blake2b256::new();
        hasher.update(self.height.to_le_bytes());
        hasher.update(self.prev_hash.as_bytes());
        hasher.update(self.created_time.to_le_bytes());
        hasher.update((self.payload.len() as u64).to_le_bytes());
        hasher.update(&self.payload);
        let mut out = [0u8; 32];
        out.copy_from_slice(&hasher.finalize());
        Hash::new(out)
    }

    /// Append a signature unless the same key has already signed.
    ///
    /// Returns `false` when the signature was a duplicate.
    pub fn add_signature(&mut self, signature: BlockSignature) -> bool {
        if self
            .signatures
            .iter()
            .any(|s| s.public_key == signature.public_key)
        {
            return false;
        }
        self.signatures.push(signature);
        true
    }

    pub fn signers(&self) -> impl Iterator<Item = &PublicKey> {
        self.signatures.iter().map(|s| &s.public_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(n: u8) -> BlockSignature {
        BlockSignature::new(PublicKey([n; 32]), Signature([n; 64]))
    }

    #[test]
    fn hash_ignores_signatures() {
        let mut block = Block::new(3, Hash::new([1; 32]), 1_000, vec![1, 2, 3]);
        let before = block.hash;
        block.add_signature(sig(1));
        assert_eq!(block.compute_hash(), before);
    }

    #[test]
    fn hash_covers_every_field() {
        let base = Block::new(3, Hash::new([1; 32]), 1_000, vec![1, 2, 3]);
        assert_ne!(base.hash, Block::new(4, Hash::new([1; 32]), 1_000, vec![1, 2, 3]).hash);
        assert_ne!(base.hash, Block::new(3, Hash::new([2; 32]), 1_000, vec![1, 2, 3]).hash);
        assert_ne!(base.hash, Block::new(3, Hash::new([1; 32]), 1_001, vec![1, 2, 3]).hash);
        assert_ne!(base.hash, Block::new(3, Hash::new([1; 32]), 1_000, vec![1, 2]).hash);
    }

    #[test]
    fn duplicate_signer_is_ignored() {
        let mut block = Block::new(1, Hash::ZERO, 0, Vec::new());
        assert!(block.add_signature(sig(1)));
        assert!(block.add_signature(sig(2)));
        assert!(!block.add_signature(sig(1)));
        assert_eq!(block.signatures.len(), 2);
        assert_eq!(block.signers().count(), 2);
    }
}
