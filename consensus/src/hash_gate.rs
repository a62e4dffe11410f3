//! The voting layer as seen from the outcome gate.

use crate::cluster_order::ClusterOrdering;
use crate::vote::RoundHash;

/// Casts votes into the external voting protocol.
///
/// Round results come back separately, as [`Outcome`](crate::Outcome)s fed to
/// the gate service.
pub trait HashGate: Send + Sync {
    /// Propose `hash` to the network, contacting peers in `order`.
    /// `alternative_order` overrides the ordering for this vote only.
    fn vote(
        &self,
        hash: RoundHash,
        order: ClusterOrdering,
        alternative_order: Option<ClusterOrdering>,
    );

    /// Stop all outgoing voting activity.
    fn stop(&self);
}
