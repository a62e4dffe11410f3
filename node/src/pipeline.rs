//! The node's commit pipeline: consensus gate → synchronizer.
//!
//! Proposal events and raw round outcomes go in; synchronization events
//! come out. Each stage is an actor processing one event at a time. The gate
//! hands its decisions to the synchronizer over a bounded queue, so every
//! decision is resolved, in the order the rounds were decided.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use quorum_consensus::{
    BlockCreatorEvent, ClusterOrdering, ConsensusError, ConsensusOutcomeGate, GateHandle,
    GateObject, GateService, HashGate, HashProvider, OneShot, Outcome, PeerOrderer,
    SupermajorityChecker,
};
use quorum_network::BlockLoader;
use quorum_store::MutableFactory;
use quorum_synchronizer::{
    ChainValidatorImpl, SynchronizationEvent, Synchronizer, SynchronizerService,
};

use crate::config::NodeConfig;
use crate::NodeError;

/// External collaborators the pipeline runs against.
pub struct Collaborators<F: MutableFactory> {
    /// The voting protocol votes are cast through.
    pub hash_gate: Arc<dyn HashGate>,
    pub orderer: Arc<dyn PeerOrderer>,
    pub hash_provider: Arc<dyn HashProvider>,
    /// Peer ordering override for the first vote only.
    pub alternative_order: Option<ClusterOrdering>,
    /// Ledger storage.
    pub factory: Arc<F>,
    /// Block download from remote peers.
    pub loader: Arc<dyn BlockLoader>,
}

/// A running commit pipeline.
pub struct Pipeline {
    gate: GateHandle,
    events: broadcast::Sender<SynchronizationEvent>,
    /// Stops both actors. Each finishes the input it is working on first.
    shutdown: broadcast::Sender<()>,
    gate_task: JoinHandle<Result<(), ConsensusError>>,
    sync_task: JoinHandle<()>,
}

impl Pipeline {
    /// Start both actors on the current tokio runtime. The gate is
    /// positioned at the ledger's current top.
    pub fn start<F: MutableFactory + 'static>(
        config: &NodeConfig,
        collaborators: Collaborators<F>,
    ) -> Result<Self, NodeError> {
        let Collaborators {
            hash_gate,
            orderer,
            hash_provider,
            alternative_order,
            factory,
            loader,
        } = collaborators;

        let ledger_state = factory.committed_ledger_state()?;
        tracing::info!(
            height = ledger_state.height(),
            peers = ledger_state.ledger_peers.len(),
            model = ?config.consistency_model,
            "starting commit pipeline"
        );

        let (shutdown, _) = broadcast::channel(1);
        let gate = ConsensusOutcomeGate::new(
            hash_gate,
            orderer,
            hash_provider,
            OneShot::new(alternative_order),
            ledger_state,
        );
        let (mut gate_service, gate_handle) = GateService::new(
            gate,
            config.gate_input_capacity,
            config.decision_capacity,
            shutdown.subscribe(),
        );

        let decisions = gate_service.decision_queue(config.decision_capacity);

        let checker = SupermajorityChecker::new(config.consistency_model);
        let validator = Arc::new(ChainValidatorImpl::new(checker));
        let synchronizer = Synchronizer::new(factory, loader, validator, config.sync.clone());
        let sync_service = SynchronizerService::new(
            synchronizer,
            decisions,
            config.event_capacity,
            shutdown.subscribe(),
        );
        let events = sync_service.event_sender();

        Ok(Self {
            gate: gate_handle,
            events,
            shutdown,
            gate_task: gate_service.spawn(),
            sync_task: sync_service.spawn(),
        })
    }

    /// Queue a proposal event for voting.
    pub async fn propose(&self, event: BlockCreatorEvent) -> Result<(), NodeError> {
        Ok(self.gate.propose(event).await?)
    }

    /// Queue a raw round outcome from the voting layer.
    pub async fn submit_outcome(&self, outcome: Outcome) -> Result<(), NodeError> {
        Ok(self.gate.submit_outcome(outcome).await?)
    }

    /// Subscribe to synchronization events emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SynchronizationEvent> {
        self.events.subscribe()
    }

    /// Observe gate decisions made from now on. An observer that falls
    /// behind misses decisions; the synchronizer never does.
    pub fn subscribe_decisions(&self) -> broadcast::Receiver<GateObject> {
        self.gate.subscribe()
    }

    /// Whether both actors are still running. The gate stops on its own
    /// only after a malformed outcome, and the synchronizer follows it.
    pub fn is_running(&self) -> bool {
        !self.gate_task.is_finished() && !self.sync_task.is_finished()
    }

    /// Run until SIGINT or SIGTERM, then stop.
    pub async fn run_until_signal(self) -> Result<(), NodeError> {
        let signal = shutdown_signal().await;
        self.stop().await?;
        signal
    }

    /// Stop both actors. Work in progress finishes; no events follow.
    ///
    /// Returns the gate's error if it had already terminated on a
    /// malformed outcome.
    pub async fn stop(self) -> Result<(), NodeError> {
        // Actors that already exited have no receiver left.
        let _ = self.shutdown.send(());
        let gate_result = self
            .gate_task
            .await
            .map_err(|e| NodeError::TaskFailed("consensus gate", e.to_string()))?;
        self.sync_task
            .await
            .map_err(|e| NodeError::TaskFailed("synchronizer", e.to_string()))?;
        tracing::info!("commit pipeline stopped");
        Ok(gate_result?)
    }
}

/// Resolves on SIGINT, or on SIGTERM where the platform has it.
async fn shutdown_signal() -> Result<(), NodeError> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    result = tokio::signal::ctrl_c() => {
                        result.map_err(|e| NodeError::Signal(e.to_string()))?;
                        tracing::info!("received SIGINT, stopping commit pipeline");
                    }
                    _ = sigterm.recv() => {
                        tracing::info!("received SIGTERM, stopping commit pipeline");
                    }
                }
                return Ok(());
            }
            Err(e) => tracing::warn!(error = %e, "cannot listen for SIGTERM"),
        }
    }

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| NodeError::Signal(e.to_string()))?;
    tracing::info!("received SIGINT, stopping commit pipeline");
    Ok(())
}
