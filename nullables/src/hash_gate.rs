//! Nullable voting gate: records votes instead of casting them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use quorum_consensus::{ClusterOrdering, HashGate, RoundHash};

/// One vote handed to the gate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CastVote {
    pub hash: RoundHash,
    pub order: ClusterOrdering,
    pub alternative_order: Option<ClusterOrdering>,
}

/// A voting gate that records every vote for later assertions.
#[derive(Default)]
pub struct NullHashGate {
    votes: Mutex<Vec<CastVote>>,
    stopped: AtomicBool,
}

impl NullHashGate {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CastVote>> {
        self.votes.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// All votes cast so far.
    pub fn votes(&self) -> Vec<CastVote> {
        self.lock().clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl HashGate for NullHashGate {
    fn vote(
        &self,
        hash: RoundHash,
        order: ClusterOrdering,
        alternative_order: Option<ClusterOrdering>,
    ) {
        self.lock().push(CastVote {
            hash,
            order,
            alternative_order,
        });
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}
