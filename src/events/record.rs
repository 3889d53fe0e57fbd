//! Event records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::IdentityToken;

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BallotEventKind {
    /// A candidate was registered.
    CandidateAdded {
        id: u32,
        address: IdentityToken,
        name: String,
    },

    /// An identity was authorized to vote.
    VoterRegistered { address: IdentityToken },

    /// A vote was accepted.
    Voted {
        candidate_id: u32,
        voter: IdentityToken,
    },

    /// Voting concluded with a frozen winner.
    VotingEnded {
        winner_id: u32,
        winner_address: IdentityToken,
    },
}

impl BallotEventKind {
    /// Stable event code for logs and external consumers.
    pub fn as_str(&self) -> &'static str {
        match self {
            BallotEventKind::CandidateAdded { .. } => "CANDIDATE_ADDED",
            BallotEventKind::VoterRegistered { .. } => "VOTER_REGISTERED",
            BallotEventKind::Voted { .. } => "VOTED",
            BallotEventKind::VotingEnded { .. } => "VOTING_ENDED",
        }
    }
}

impl fmt::Display for BallotEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single emitted event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotEvent {
    /// Monotonically increasing per engine instance, starting at 1.
    pub sequence: u64,

    /// When the engine emitted the event.
    pub timestamp: DateTime<Utc>,

    /// The fact itself.
    #[serde(flatten)]
    pub kind: BallotEventKind,
}

impl BallotEvent {
    /// Stamp a new event with the given sequence number.
    pub fn new(sequence: u64, kind: BallotEventKind) -> Self {
        Self {
            sequence,
            timestamp: Utc::now(),
            kind,
        }
    }
}
