//! Round-specific peer orderings.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use quorum_types::Peer;

use crate::cluster_order::ClusterOrdering;
use crate::vote::RoundHash;

/// Computes the peer ordering used to cast a vote.
pub trait PeerOrderer: Send + Sync {
    /// Order `peers` for the round in `hash`; `None` when no ordering exists.
    fn get_ordering(&self, hash: &RoundHash, peers: &[Peer]) -> Option<ClusterOrdering>;
}

/// Shuffles the ledger peers with a PRNG seeded from the voted block hash, so
/// every node voting for the same block derives the same order.
#[derive(Debug, Default)]
pub struct SeededPeerOrderer;

impl PeerOrderer for SeededPeerOrderer {
    fn get_ordering(&self, hash: &RoundHash, peers: &[Peer]) -> Option<ClusterOrdering> {
        let mut rng = ChaCha8Rng::from_seed(*hash.vote_hashes.block_hash.as_bytes());
        let mut order = peers.to_vec();
        order.shuffle(&mut rng);
        ClusterOrdering::create(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vote::VoteHashes;
    use quorum_types::{Hash, PublicKey, Round};

    fn peers(n: u8) -> Vec<Peer> {
        (0..n)
            .map(|i| Peer::new(format!("10.0.0.{i}:10001"), PublicKey([i; 32])))
            .collect()
    }

    fn hash(block: u8) -> RoundHash {
        RoundHash::new(
            Round::new(2, 0),
            VoteHashes::new(Hash::new([1; 32]), Hash::new([block; 32])),
        )
    }

    #[test]
    fn same_hash_same_order() {
        let orderer = SeededPeerOrderer;
        let a = orderer.get_ordering(&hash(7), &peers(10)).unwrap();
        let b = orderer.get_ordering(&hash(7), &peers(10)).unwrap();
        assert_eq!(a.peers(), b.peers());
    }

    #[test]
    fn ordering_is_a_permutation() {
        let mut ordered: Vec<_> = SeededPeerOrderer
            .get_ordering(&hash(3), &peers(8))
            .unwrap()
            .peers()
            .iter()
            .map(|p| p.public_key)
            .collect();
        ordered.sort();
        let expected: Vec<_> = peers(8).into_iter().map(|p| p.public_key).collect();
        assert_eq!(ordered, expected);
    }

    #[test]
    fn no_peers_no_ordering() {
        assert!(SeededPeerOrderer.get_ordering(&hash(1), &[]).is_none());
    }
}
