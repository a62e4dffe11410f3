//! Peer orderings for a voting round.

use quorum_types::Peer;

/// The order in which peers are contacted during one voting round.
///
/// Never empty; the cursor starts at the first peer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterOrdering {
    order: Vec<Peer>,
    index: usize,
}

impl ClusterOrdering {
    /// Build an ordering over `peers`, or `None` when there are no peers.
    pub fn create(peers: Vec<Peer>) -> Option<Self> {
        if peers.is_empty() {
            return None;
        }
        Some(Self {
            order: peers,
            index: 0,
        })
    }

    pub fn peers(&self) -> &[Peer] {
        &self.order
    }

    pub fn current_leader(&self) -> &Peer {
        &self.order[self.index]
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.order.len()
    }

    /// Move the cursor to the next peer, wrapping around at the end.
    pub fn switch_to_next(&mut self) -> &mut Self {
        self.index = (self.index + 1) % self.order.len();
        self
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// A value that can be taken at most once.
///
/// Holds the alternative peer ordering handed to the first vote after
/// startup; every later vote sees it consumed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OneShot<T>(Option<T>);

impl<T> OneShot<T> {
    pub fn new(value: Option<T>) -> Self {
        Self(value)
    }

    pub fn empty() -> Self {
        Self(None)
    }

    /// Take the value; every later call returns `None`.
    pub fn consume_once(&mut self) -> Option<T> {
        self.0.take()
    }

    pub fn is_consumed(&self) -> bool {
        self.0.is_none()
    }
}
