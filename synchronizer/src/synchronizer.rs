//! Commit engine: makes the local ledger match each gate decision.

use std::sync::Arc;

use quorum_consensus::GateObject;
use quorum_network::BlockLoader;
use quorum_store::{MutableFactory, MutableStorage, StoreError};
use quorum_types::{Block, LedgerState, PublicKey, Round};

use crate::config::SyncConfig;
use crate::event::{SynchronizationEvent, SynchronizationOutcomeType};
use crate::validator::ChainValidator;
use crate::SyncError;

/// Turns [`GateObject`]s into ledger commits.
///
/// Agreed blocks this node voted for are committed directly; anything else
/// is downloaded from the peers that signed the decision.
pub struct Synchronizer<F: MutableFactory> {
    factory: Arc<F>,
    loader: Arc<dyn BlockLoader>,
    validator: Arc<dyn ChainValidator>,
    config: SyncConfig,
}

impl<F: MutableFactory> Synchronizer<F> {
    pub fn new(
        factory: Arc<F>,
        loader: Arc<dyn BlockLoader>,
        validator: Arc<dyn ChainValidator>,
        config: SyncConfig,
    ) -> Self {
        Self {
            factory,
            loader,
            validator,
            config,
        }
    }

    /// Resolve one gate decision.
    ///
    /// `None` means nothing could be committed; the ledger stays where it
    /// was and a later decision retries.
    pub async fn process_outcome(&self, object: GateObject) -> Option<SynchronizationEvent> {
        tracing::debug!(
            kind = object.kind(),
            round = %object.round(),
            "processing consensus outcome"
        );
        match object {
            GateObject::PairValid { round, block, .. } => self.process_next(round, block),
            GateObject::VoteOther {
                round,
                ledger_state,
                signers,
                ..
            } => {
                self.process_different(round, &ledger_state, round.block_round, &signers)
                    .await
            }
            GateObject::Future {
                round,
                ledger_state,
                signers,
            } => {
                let required = round.block_round.saturating_sub(1);
                self.process_different(round, &ledger_state, required, &signers)
                    .await
            }
            GateObject::AgreementOnNone {
                round, ledger_state, ..
            } => Some(SynchronizationEvent::new(
                SynchronizationOutcomeType::Nothing,
                round,
                ledger_state,
            )),
            GateObject::BlockReject {
                round, ledger_state, ..
            }
            | GateObject::ProposalReject {
                round, ledger_state, ..
            } => Some(SynchronizationEvent::new(
                SynchronizationOutcomeType::Reject,
                round,
                ledger_state,
            )),
        }
    }

    /// Commit the block this node voted for, through the prepared path when
    /// the backend has it ready.
    fn process_next(&self, round: Round, block: Arc<Block>) -> Option<SynchronizationEvent> {
        let committed = if self.factory.prepared_commit_enabled() {
            match self.factory.commit_prepared(&block) {
                Ok(state) => Some(state),
                Err(e) => {
                    tracing::warn!(
                        height = block.height,
                        error = %e,
                        "prepared commit failed, applying block"
                    );
                    None
                }
            }
        } else {
            None
        };

        let state = match committed {
            Some(state) => state,
            None => match self.apply_and_commit(block) {
                Ok(state) => state,
                Err(e) => {
                    tracing::error!(%round, error = %e, "failed to commit agreed block");
                    return None;
                }
            },
        };

        tracing::info!(%round, height = state.height(), "committed agreed block");
        Some(SynchronizationEvent::new(
            SynchronizationOutcomeType::Commit,
            round,
            state,
        ))
    }

    fn apply_and_commit(&self, block: Arc<Block>) -> Result<Arc<LedgerState>, StoreError> {
        let mut storage = self.factory.create_mutable_storage()?;
        storage.apply(block)?;
        self.factory.commit(storage)
    }

    async fn process_different(
        &self,
        round: Round,
        ledger_state: &LedgerState,
        required_height: u64,
        signers: &[PublicKey],
    ) -> Option<SynchronizationEvent> {
        let start_height = ledger_state.height();
        match self
            .download_and_commit_missing_blocks(start_height, required_height, signers)
            .await
        {
            Ok(Some(state)) => {
                tracing::info!(%round, height = state.height(), "synchronized with agreed chain");
                Some(SynchronizationEvent::new(
                    SynchronizationOutcomeType::Commit,
                    round,
                    state,
                ))
            }
            Ok(None) => None,
            Err(e) => {
                tracing::error!(%round, error = %e, "synchronization failed");
                None
            }
        }
    }

    /// Download the chain up to `target_height` from `peers`, one peer at a
    /// time in the given order, and commit it.
    ///
    /// One transaction spans the whole attempt, so blocks validated from one
    /// peer are kept when the next peer is asked. `Ok(None)` means the
    /// ledger already reached `target_height`.
    pub async fn download_and_commit_missing_blocks(
        &self,
        start_height: u64,
        target_height: u64,
        peers: &[PublicKey],
    ) -> Result<Option<Arc<LedgerState>>, SyncError> {
        let mut storage = self.factory.create_mutable_storage()?;
        let mut height = storage.ledger_state().height();
        if height >= target_height {
            tracing::info!(height, target_height, "ledger already at target height");
            return Ok(None);
        }
        if height != start_height {
            tracing::debug!(start_height, height, "ledger moved since the decision");
        }

        for peer in peers {
            for _ in 0..self.config.max_requests_per_peer {
                tracing::debug!(%peer, from = height + 1, to = target_height, "downloading blocks");
                let blocks = self.loader.retrieve_blocks(height, peer);
                let valid = self.validator.validate_and_apply(blocks, &mut storage).await;

                let reached = storage.ledger_state().height();
                let progressed = reached > height;
                height = reached;

                if valid && height >= target_height {
                    return Ok(Some(self.factory.commit(storage)?));
                }
                if !valid || !progressed {
                    break;
                }
                tracing::debug!(%peer, height, "partial chain received, asking again");
            }
        }

        Err(SyncError::PeersExhausted {
            target: target_height,
            reached: height,
        })
    }
}
