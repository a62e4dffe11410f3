//! Ledger peers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::PublicKey;

/// A peer registered in the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Peer {
    /// Network address, `"host:port"`.
    pub address: String,
    pub public_key: PublicKey,
}

impl Peer {
    pub fn new(address: impl Into<String>, public_key: PublicKey) -> Self {
        Self {
            address: address.into(),
            public_key,
        }
    }
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.public_key, self.address)
    }
}
