use proptest::prelude::*;

use quorum_types::{Block, Hash, Round};

proptest! {
    /// Round ordering is lexicographic over (block_round, reject_round).
    #[test]
    fn round_ordering_is_lexicographic(
        a in 0u64..1_000, b in 0u64..1_000, c in 0u64..1_000, d in 0u64..1_000,
    ) {
        let lhs = Round::new(a, b);
        let rhs = Round::new(c, d);
        prop_assert_eq!(lhs.cmp(&rhs), (a, b).cmp(&(c, d)));
    }

    /// The next block round is always ahead of every reject round at the current height.
    #[test]
    fn next_block_round_beats_any_reject(b in 0u64..u64::MAX - 1, r in 0u64..u64::MAX) {
        let round = Round::new(b, r);
        prop_assert!(round.next_block_round() > round);
    }

    /// Hash::is_zero is true only for all-zero bytes.
    #[test]
    fn hash_is_zero_correct(bytes in prop::array::uniform32(0u8..)) {
        prop_assert_eq!(Hash::new(bytes).is_zero(), bytes == [0u8; 32]);
    }

    /// Block::new always produces a hash that verifies against compute_hash.
    #[test]
    fn new_block_hash_is_consistent(
        height in 1u64..10_000,
        prev in prop::array::uniform32(0u8..),
        time in 0u64..u64::MAX,
        payload in prop::collection::vec(0u8.., 0..64),
    ) {
        let block = Block::new(height, Hash::new(prev), time, payload);
        prop_assert_eq!(block.hash, block.compute_hash());
    }
}
