//! Votes exchanged by the voting layer.

use serde::{Deserialize, Serialize};

use quorum_types::{BlockSignature, Hash, PublicKey, Round};

use crate::ConsensusError;

/// What a peer voted for in one round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteHashes {
    /// Hash of the proposal; [`Hash::ZERO`] for a vote for nothing.
    pub proposal_hash: Hash,
    /// Hash of the block built from the proposal.
    pub block_hash: Hash,
}

impl VoteHashes {
    pub fn new(proposal_hash: Hash, block_hash: Hash) -> Self {
        Self {
            proposal_hash,
            block_hash,
        }
    }

    /// Whether this is a vote for nothing.
    pub fn is_empty(&self) -> bool {
        self.proposal_hash.is_zero()
    }
}

/// A round together with the hashes voted for in it.
///
/// Equality compares the round and the vote hashes only; the carried block
/// signature is not part of a hash's identity.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RoundHash {
    pub vote_round: Round,
    pub vote_hashes: VoteHashes,
    /// The voter's signature over the block, appended to the block on commit.
    pub block_signature: Option<BlockSignature>,
}

impl RoundHash {
    pub fn new(vote_round: Round, vote_hashes: VoteHashes) -> Self {
        Self {
            vote_round,
            vote_hashes,
            block_signature: None,
        }
    }

    pub fn with_block_signature(mut self, signature: BlockSignature) -> Self {
        self.block_signature = Some(signature);
        self
    }
}

impl PartialEq for RoundHash {
    fn eq(&self, other: &Self) -> bool {
        self.vote_round == other.vote_round && self.vote_hashes == other.vote_hashes
    }
}

impl Eq for RoundHash {}

/// One peer's signed vote. Authenticated upstream; immutable once observed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteMessage {
    pub hash: RoundHash,
    pub signature: BlockSignature,
}

impl VoteMessage {
    pub fn new(hash: RoundHash, signature: BlockSignature) -> Self {
        Self { hash, signature }
    }

    pub fn signer(&self) -> &PublicKey {
        &self.signature.public_key
    }
}

/// The hash shared by all `votes` of one outcome.
///
/// Every vote of an outcome must be for the same round; the first vote's
/// hash is returned.
pub fn round_hash(votes: &[VoteMessage]) -> Result<&RoundHash, ConsensusError> {
    let first = votes.first().ok_or(ConsensusError::EmptyOutcome)?;
    if let Some(odd) = votes
        .iter()
        .find(|v| v.hash.vote_round != first.hash.vote_round)
    {
        return Err(ConsensusError::MalformedOutcome {
            expected: first.hash.vote_round,
            found: odd.hash.vote_round,
        });
    }
    Ok(&first.hash)
}

/// Public keys of the peers that cast `votes`, in vote order.
pub fn signers(votes: &[VoteMessage]) -> Vec<PublicKey> {
    votes.iter().map(|v| *v.signer()).collect()
}
