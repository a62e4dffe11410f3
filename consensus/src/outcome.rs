//! Raw results of completed voting rounds.

use serde::{Deserialize, Serialize};

use crate::vote::VoteMessage;

/// A supermajority voted for the same hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMessage {
    pub votes: Vec<VoteMessage>,
}

/// No hash can reach a supermajority any more.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectMessage {
    pub votes: Vec<VoteMessage>,
}

/// Votes for a round ahead of the local one were observed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FutureMessage {
    pub votes: Vec<VoteMessage>,
}

/// The three shapes a completed voting round can take.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Commit(CommitMessage),
    Reject(RejectMessage),
    Future(FutureMessage),
}

impl Outcome {
    pub fn commit(votes: Vec<VoteMessage>) -> Self {
        Self::Commit(CommitMessage { votes })
    }

    pub fn reject(votes: Vec<VoteMessage>) -> Self {
        Self::Reject(RejectMessage { votes })
    }

    pub fn future(votes: Vec<VoteMessage>) -> Self {
        Self::Future(FutureMessage { votes })
    }

    pub fn votes(&self) -> &[VoteMessage] {
        match self {
            Self::Commit(m) => &m.votes,
            Self::Reject(m) => &m.votes,
            Self::Future(m) => &m.votes,
        }
    }
}
