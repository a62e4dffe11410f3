//! Actor owning the consensus outcome gate.
//!
//! The service is the only place the gate's state is touched. Proposals and
//! raw outcomes arrive over bounded mpsc channels and are processed one at a
//! time. Every decision goes, in the order it was made, to the decision
//! queue (if one was taken) and to broadcast subscribers.
//!
//! The decision queue is lossless: when it is full the gate waits for the
//! consumer. Broadcast subscribers that fall behind miss decisions.

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::block_creator::BlockCreatorEvent;
use crate::error::ConsensusError;
use crate::gate::ConsensusOutcomeGate;
use crate::gate_object::GateObject;
use crate::outcome::Outcome;

/// Default capacity of the proposal and outcome input channels.
pub const DEFAULT_INPUT_CAPACITY: usize = 64;
/// Default capacity of the decision broadcast channel and decision queue.
pub const DEFAULT_OUTPUT_CAPACITY: usize = 256;

/// Gate actor. Build with [`GateService::new`], start with [`spawn`](Self::spawn).
pub struct GateService {
    gate: ConsensusOutcomeGate,
    proposals: mpsc::Receiver<BlockCreatorEvent>,
    outcomes: mpsc::Receiver<Outcome>,
    published: broadcast::Sender<GateObject>,
    queue: Option<mpsc::Sender<GateObject>>,
    shutdown: broadcast::Receiver<()>,
}

/// Client side of a [`GateService`]: feeds its inputs and subscribes to its
/// decisions.
#[derive(Clone)]
pub struct GateHandle {
    proposals: mpsc::Sender<BlockCreatorEvent>,
    outcomes: mpsc::Sender<Outcome>,
    published: broadcast::Sender<GateObject>,
}

impl GateService {
    /// Create the service and its companion [`GateHandle`].
    pub fn new(
        gate: ConsensusOutcomeGate,
        input_capacity: usize,
        output_capacity: usize,
        shutdown: broadcast::Receiver<()>,
    ) -> (Self, GateHandle) {
        let (proposal_tx, proposal_rx) = mpsc::channel(input_capacity);
        let (outcome_tx, outcome_rx) = mpsc::channel(input_capacity);
        let (published, _) = broadcast::channel(output_capacity);

        let service = Self {
            gate,
            proposals: proposal_rx,
            outcomes: outcome_rx,
            published: published.clone(),
            queue: None,
            shutdown,
        };
        let handle = GateHandle {
            proposals: proposal_tx,
            outcomes: outcome_tx,
            published,
        };
        (service, handle)
    }

    /// Take the bounded queue every decision is delivered to. The gate
    /// stops taking inputs while the queue is full. Replaces any queue taken
    /// before.
    pub fn decision_queue(&mut self, capacity: usize) -> mpsc::Receiver<GateObject> {
        let (tx, rx) = mpsc::channel(capacity);
        self.queue = Some(tx);
        rx
    }

    pub fn spawn(self) -> JoinHandle<Result<(), ConsensusError>> {
        tokio::spawn(self.run())
    }

    /// Process inputs until shutdown, until every input sender is dropped,
    /// or until a malformed outcome arrives.
    pub async fn run(mut self) -> Result<(), ConsensusError> {
        let result = self.event_loop().await;
        self.gate.stop();
        if let Err(e) = &result {
            tracing::error!(error = %e, "consensus gate terminated");
        }
        result
    }

    async fn event_loop(&mut self) -> Result<(), ConsensusError> {
        let mut proposals_open = true;
        let mut outcomes_open = true;

        while proposals_open || outcomes_open {
            tokio::select! {
                biased;
                _ = self.shutdown.recv() => {
                    tracing::info!("consensus gate shutting down");
                    return Ok(());
                }
                event = self.proposals.recv(), if proposals_open => match event {
                    Some(event) => self.gate.vote(event),
                    None => proposals_open = false,
                },
                outcome = self.outcomes.recv(), if outcomes_open => match outcome {
                    Some(outcome) => self.publish(&outcome).await?,
                    None => outcomes_open = false,
                },
            }
        }
        tracing::debug!("consensus gate inputs closed");
        Ok(())
    }

    async fn publish(&mut self, outcome: &Outcome) -> Result<(), ConsensusError> {
        let Some(object) = self.gate.process_outcome(outcome)? else {
            return Ok(());
        };
        tracing::debug!(kind = object.kind(), round = %object.round(), "gate decision");
        // No subscribers is not an error; the decision is simply unobserved.
        let _ = self.published.send(object.clone());

        let delivered = match &self.queue {
            Some(queue) => queue.send(object).await.is_ok(),
            None => true,
        };
        if !delivered {
            tracing::debug!("decision queue consumer gone");
            self.queue = None;
        }
        Ok(())
    }
}

impl GateHandle {
    /// Queue a proposal event for voting.
    pub async fn propose(&self, event: BlockCreatorEvent) -> Result<(), ConsensusError> {
        self.proposals
            .send(event)
            .await
            .map_err(|_| ConsensusError::ChannelClosed)
    }

    /// Queue a raw round outcome from the voting layer.
    pub async fn submit_outcome(&self, outcome: Outcome) -> Result<(), ConsensusError> {
        self.outcomes
            .send(outcome)
            .await
            .map_err(|_| ConsensusError::ChannelClosed)
    }

    /// Subscribe to gate decisions made from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<GateObject> {
        self.published.subscribe()
    }
}
