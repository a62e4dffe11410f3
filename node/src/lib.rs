//! Quorum node: runs the agreement-to-commit pipeline.
//!
//! The node wires the consensus outcome gate to the synchronizer:
//! - Votes are cast for each proposed round
//! - Voting-round outcomes are interpreted against the node's own vote
//! - Agreed blocks are committed, missing chains downloaded from peers
//! - Synchronization events are published to drive the next round

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;

pub use config::NodeConfig;
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use pipeline::{Collaborators, Pipeline};
