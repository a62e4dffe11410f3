//! Consensus outcome gate for the quorum commit layer.
//!
//! Turns the results of voting rounds into a small closed set of decisions
//! about which block becomes canonical.
//!
//! ## Module overview
//!
//! - [`vote`]: voted hashes and signed votes.
//! - [`outcome`]: raw round results: commit, reject, future.
//! - [`gate_object`]: decisions published to the synchronizer.
//! - [`gate`]: [`ConsensusOutcomeGate`], the round interpreter.
//! - [`service`]: the actor that owns the gate and broadcasts its decisions.
//! - [`peer_orderer`] / [`cluster_order`]: peer orderings for casting votes.
//! - [`supermajority`]: Kf+1 supermajority rules.

pub mod block_creator;
pub mod cluster_order;
pub mod error;
pub mod gate;
pub mod gate_object;
pub mod hash_gate;
pub mod hash_provider;
pub mod outcome;
pub mod peer_orderer;
pub mod result_cache;
pub mod service;
pub mod supermajority;
pub mod vote;

pub use block_creator::{BlockCreatorEvent, RoundData};
pub use cluster_order::{ClusterOrdering, OneShot};
pub use error::ConsensusError;
pub use gate::ConsensusOutcomeGate;
pub use gate_object::GateObject;
pub use hash_gate::HashGate;
pub use hash_provider::{DefaultHashProvider, HashProvider};
pub use outcome::{CommitMessage, FutureMessage, Outcome, RejectMessage};
pub use peer_orderer::{PeerOrderer, SeededPeerOrderer};
pub use result_cache::ConsensusResultCache;
pub use service::{GateHandle, GateService};
pub use supermajority::{ConsistencyModel, SupermajorityChecker};
pub use vote::{RoundHash, VoteHashes, VoteMessage};
