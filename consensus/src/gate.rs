//! Consensus outcome gate: interprets voting-round results against the
//! node's own vote.
//!
//! The gate casts this node's vote for each new round and turns every raw
//! [`Outcome`] coming back from the voting layer into at most one
//! [`GateObject`] for the synchronizer.

use std::sync::Arc;

use quorum_types::{Block, LedgerState, Round};

use crate::block_creator::BlockCreatorEvent;
use crate::cluster_order::{ClusterOrdering, OneShot};
use crate::error::ConsensusError;
use crate::gate_object::GateObject;
use crate::hash_gate::HashGate;
use crate::hash_provider::HashProvider;
use crate::outcome::{CommitMessage, FutureMessage, Outcome, RejectMessage};
use crate::peer_orderer::PeerOrderer;
use crate::result_cache::ConsensusResultCache;
use crate::vote::{round_hash, signers, RoundHash, VoteHashes, VoteMessage};

/// Voting-round interpreter for one node.
pub struct ConsensusOutcomeGate {
    hash_gate: Arc<dyn HashGate>,
    orderer: Arc<dyn PeerOrderer>,
    hash_provider: Arc<dyn HashProvider>,
    alternative_order: OneShot<ClusterOrdering>,
    /// The last hash this node voted for.
    current_hash: RoundHash,
    /// The block voted for in `current_hash`, if any.
    current_block: Option<Arc<Block>>,
    /// Ledger state as of the last vote.
    current_ledger_state: Arc<LedgerState>,
    result_cache: ConsensusResultCache,
}

impl ConsensusOutcomeGate {
    /// Create a gate positioned at the top of `ledger_state`: the first vote
    /// it accepts is for the round after `(top_height, 0)`.
    pub fn new(
        hash_gate: Arc<dyn HashGate>,
        orderer: Arc<dyn PeerOrderer>,
        hash_provider: Arc<dyn HashProvider>,
        alternative_order: OneShot<ClusterOrdering>,
        ledger_state: Arc<LedgerState>,
    ) -> Self {
        let current_hash =
            RoundHash::new(Round::new(ledger_state.height(), 0), VoteHashes::default());
        Self {
            hash_gate,
            orderer,
            hash_provider,
            alternative_order,
            current_hash,
            current_block: None,
            current_ledger_state: ledger_state,
            result_cache: ConsensusResultCache::new(),
        }
    }

    pub fn current_hash(&self) -> &RoundHash {
        &self.current_hash
    }

    pub fn current_block(&self) -> Option<&Arc<Block>> {
        self.current_block.as_ref()
    }

    pub fn ledger_state(&self) -> &Arc<LedgerState> {
        &self.current_ledger_state
    }

    /// Read-only view of the voted-block cache.
    pub fn result_cache(&self) -> &ConsensusResultCache {
        &self.result_cache
    }

    /// Cast this node's vote for the round in `event`.
    ///
    /// Rounds not strictly after the current one are ignored.
    pub fn vote(&mut self, event: BlockCreatorEvent) {
        if self.current_hash.vote_round >= event.round {
            tracing::info!(
                current = %self.current_hash.vote_round,
                round = %event.round,
                "vote round is not ahead of current round, skipped"
            );
            return;
        }

        self.current_hash = self.hash_provider.make_hash(&event);
        if self.current_hash.vote_round.block_round != event.ledger_state.height() + 1 {
            tracing::warn!(
                round = %self.current_hash.vote_round,
                height = event.ledger_state.height(),
                "vote round does not follow the ledger top"
            );
        }
        self.current_ledger_state = event.ledger_state;

        match event.round_data {
            None => {
                self.current_block = None;
                self.result_cache.release();
                tracing::debug!(round = %self.current_hash.vote_round, "voting for nothing");
            }
            Some(data) => {
                tracing::info!(
                    round = %self.current_hash.vote_round,
                    proposal = %data.proposal_hash,
                    block = %data.block.hash,
                    "voting for block"
                );
                self.result_cache.insert(Arc::clone(&data.block));
                self.current_block = Some(data.block);
            }
        }

        let Some(order) = self
            .orderer
            .get_ordering(&self.current_hash, &self.current_ledger_state.ledger_peers)
        else {
            tracing::error!(
                round = %self.current_hash.vote_round,
                "no peer ordering available, round passed"
            );
            return;
        };

        let alternative = self.alternative_order.consume_once();
        self.hash_gate.vote(self.current_hash.clone(), order, alternative);
    }

    /// Interpret one raw round result.
    ///
    /// `Ok(None)` means the outcome was stale and dropped. An outcome whose
    /// votes disagree on the round is an error the caller must not recover
    /// from.
    pub fn process_outcome(
        &mut self,
        outcome: &Outcome,
    ) -> Result<Option<GateObject>, ConsensusError> {
        match outcome {
            Outcome::Commit(msg) => self.handle_commit(msg),
            Outcome::Reject(msg) => self.handle_reject(msg),
            Outcome::Future(msg) => self.handle_future(msg),
        }
    }

    /// A commit for a later height than the one voted in means this node is
    /// behind: an agreed block is synchronized up to that block, an agreement
    /// on nothing up to the height before it.
    pub fn handle_commit(
        &mut self,
        msg: &CommitMessage,
    ) -> Result<Option<GateObject>, ConsensusError> {
        let hash = round_hash(&msg.votes)?;
        if hash.vote_round < self.current_hash.vote_round {
            tracing::info!(
                current = %self.current_hash.vote_round,
                round = %hash.vote_round,
                "commit round is behind current round, skipped"
            );
            return Ok(None);
        }
        if hash.vote_round.block_round != self.current_hash.vote_round.block_round {
            if hash.vote_hashes.is_empty() {
                tracing::warn!(
                    current = %self.current_hash.vote_round,
                    round = %hash.vote_round,
                    "agreement on nothing for a later height, handling as future"
                );
                return Ok(Some(self.future(hash.vote_round, &msg.votes)));
            }
            tracing::warn!(
                current = %self.current_hash.vote_round,
                round = %hash.vote_round,
                "commit for a later height, synchronizing to the agreed block"
            );
            return Ok(Some(self.vote_other(hash, &msg.votes)));
        }

        if *hash == self.current_hash {
            if let Some(block) = self.current_block.as_mut() {
                let block_mut = Arc::make_mut(block);
                for sig in msg.votes.iter().filter_map(|v| v.hash.block_signature) {
                    block_mut.add_signature(sig);
                }
                let block = Arc::clone(block);
                self.result_cache.insert(Arc::clone(&block));
                tracing::info!(
                    height = block.height,
                    hash = %block.hash,
                    signatures = block.signatures.len(),
                    "consensus reached on own block"
                );
                return Ok(Some(GateObject::PairValid {
                    round: self.current_hash.vote_round,
                    ledger_state: Arc::clone(&self.current_ledger_state),
                    block,
                }));
            }
        }

        if hash.vote_hashes.is_empty() {
            self.current_block = None;
            self.result_cache.release();
            tracing::info!(round = %hash.vote_round, "consensus agreed on nothing");
            return Ok(Some(GateObject::AgreementOnNone {
                round: hash.vote_round,
                ledger_state: Arc::clone(&self.current_ledger_state),
                signers: signers(&msg.votes),
            }));
        }

        Ok(Some(self.vote_other(hash, &msg.votes)))
    }

    pub fn handle_reject(
        &mut self,
        msg: &RejectMessage,
    ) -> Result<Option<GateObject>, ConsensusError> {
        let hash = round_hash(&msg.votes)?;
        if hash.vote_round < self.current_hash.vote_round {
            tracing::info!(
                current = %self.current_hash.vote_round,
                round = %hash.vote_round,
                "reject round is behind current round, skipped"
            );
            return Ok(None);
        }
        if hash.vote_round.block_round != self.current_hash.vote_round.block_round {
            tracing::warn!(
                current = %self.current_hash.vote_round,
                round = %hash.vote_round,
                "reject for a later height, handling as future"
            );
            return Ok(Some(self.future(hash.vote_round, &msg.votes)));
        }

        let round = hash.vote_round;
        let first_proposal = hash.vote_hashes.proposal_hash;
        let same_proposal = msg
            .votes
            .iter()
            .all(|v| v.hash.vote_hashes.proposal_hash == first_proposal);
        let ledger_state = Arc::clone(&self.current_ledger_state);
        let signers = signers(&msg.votes);

        if same_proposal {
            tracing::info!(%round, "block reject, proposal hashes match");
            Ok(Some(GateObject::BlockReject {
                round,
                ledger_state,
                signers,
            }))
        } else {
            tracing::info!(%round, "proposal reject, proposal hashes differ");
            Ok(Some(GateObject::ProposalReject {
                round,
                ledger_state,
                signers,
            }))
        }
    }

    pub fn handle_future(
        &mut self,
        msg: &FutureMessage,
    ) -> Result<Option<GateObject>, ConsensusError> {
        let hash = round_hash(&msg.votes)?;
        if hash.vote_round.block_round <= self.current_hash.vote_round.block_round {
            tracing::info!(
                current = %self.current_hash.vote_round,
                round = %hash.vote_round,
                "future round is not ahead of current height, skipped"
            );
            return Ok(None);
        }
        tracing::info!(round = %hash.vote_round, "message from the future, waiting for sync");
        Ok(Some(self.future(hash.vote_round, &msg.votes)))
    }

    /// Stop outgoing voting.
    pub fn stop(&self) {
        self.hash_gate.stop();
    }

    /// The network agreed on a block this node did not vote for; its own
    /// vote is obsolete.
    fn vote_other(&mut self, hash: &RoundHash, votes: &[VoteMessage]) -> GateObject {
        self.current_block = None;
        self.result_cache.release();

        let block_hash = self.hash_provider.to_model_hash(hash);
        tracing::info!(
            round = %hash.vote_round,
            block = %block_hash,
            "consensus reached on another block, waiting for sync"
        );
        GateObject::VoteOther {
            round: hash.vote_round,
            ledger_state: Arc::clone(&self.current_ledger_state),
            signers: signers(votes),
            block_hash,
        }
    }

    fn future(&self, round: Round, votes: &[VoteMessage]) -> GateObject {
        GateObject::Future {
            round,
            ledger_state: Arc::clone(&self.current_ledger_state),
            signers: signers(votes),
        }
    }
}
