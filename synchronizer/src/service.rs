//! Actor driving the synchronizer from the gate's decision stream.

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use quorum_consensus::GateObject;
use quorum_store::MutableFactory;

use crate::event::SynchronizationEvent;
use crate::synchronizer::Synchronizer;

/// Default capacity of the synchronization event broadcast channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Processes gate decisions one at a time, in the order they were made,
/// and broadcasts the resulting [`SynchronizationEvent`]s.
pub struct SynchronizerService<F: MutableFactory + 'static> {
    synchronizer: Synchronizer<F>,
    decisions: mpsc::Receiver<GateObject>,
    events: broadcast::Sender<SynchronizationEvent>,
    shutdown: broadcast::Receiver<()>,
}

impl<F: MutableFactory + 'static> SynchronizerService<F> {
    pub fn new(
        synchronizer: Synchronizer<F>,
        decisions: mpsc::Receiver<GateObject>,
        event_capacity: usize,
        shutdown: broadcast::Receiver<()>,
    ) -> Self {
        let (events, _) = broadcast::channel(event_capacity);
        Self {
            synchronizer,
            decisions,
            events,
            shutdown,
        }
    }

    /// Subscribe to synchronization events emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SynchronizationEvent> {
        self.events.subscribe()
    }

    /// Sender side of the event stream, for late subscribers.
    pub fn event_sender(&self) -> broadcast::Sender<SynchronizationEvent> {
        self.events.clone()
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Run until shutdown or until the gate's decision stream closes.
    ///
    /// A decision being processed when shutdown arrives is finished first.
    pub async fn run(mut self) {
        loop {
            let object = tokio::select! {
                biased;
                _ = self.shutdown.recv() => {
                    tracing::info!("synchronizer shutting down");
                    break;
                }
                object = self.decisions.recv() => match object {
                    Some(object) => object,
                    None => {
                        tracing::debug!("gate decision queue closed");
                        break;
                    }
                },
            };

            if let Some(event) = self.synchronizer.process_outcome(object).await {
                tracing::debug!(
                    outcome = ?event.sync_outcome,
                    round = %event.round,
                    height = event.ledger_state.height(),
                    "synchronization event"
                );
                let _ = self.events.send(event);
            }
        }
    }
}
