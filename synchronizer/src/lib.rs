//! Synchronizer for the quorum commit layer.
//!
//! Consumes the consensus gate's decisions and makes the local ledger match
//! them: blocks this node voted for are committed directly, missing chains
//! are downloaded from the peers that signed the decision, validated and
//! committed.

pub mod config;
pub mod error;
pub mod event;
pub mod service;
pub mod synchronizer;
pub mod validator;

pub use config::SyncConfig;
pub use error::SyncError;
pub use event::{SynchronizationEvent, SynchronizationOutcomeType};
pub use service::SynchronizerService;
pub use synchronizer::Synchronizer;
pub use validator::{ChainValidator, ChainValidatorImpl};
