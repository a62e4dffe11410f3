//! Cryptographic primitives for the quorum commit layer.
//!
//! - **Ed25519** for peer keys, block signatures and vote signatures.
//! - Block hashing itself lives on [`quorum_types::Block::compute_hash`].

pub mod keys;
pub mod sign;

pub use keys::{generate_keypair, keypair_from_seed, public_from_private};
pub use sign::{sign_block, sign_message, verify_block_signature, verify_signature};
