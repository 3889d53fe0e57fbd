//! Voting Lifecycle State Machine
//!
//! - States are explicit and enumerable
//! - The only transition is one-way: Open -> Concluded
//! - Concluded is terminal; the stored winner never changes

use serde::{Deserialize, Serialize};

use super::errors::{BallotError, BallotResult};
use super::registry::Candidate;

/// Lifecycle of a single election cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum VotingPhase {
    /// Votes are being accepted.
    Open,

    /// Voting has ended.
    Concluded {
        /// The leader frozen at the moment of conclusion.
        winner: Candidate,
    },
}

impl Default for VotingPhase {
    fn default() -> Self {
        Self::new()
    }
}

impl VotingPhase {
    /// Create a new lifecycle in the Open state.
    pub fn new() -> Self {
        Self::Open
    }

    /// State name for observability.
    pub fn state_name(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Concluded { .. } => "Concluded",
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    pub fn is_concluded(&self) -> bool {
        matches!(self, Self::Concluded { .. })
    }

    /// Open -> Concluded.
    ///
    /// Re-concluding a terminal state is rejected; the stored winner is
    /// immutable once set.
    pub fn conclude(self, winner: Candidate) -> BallotResult<Self> {
        match self {
            Self::Open => Ok(Self::Concluded { winner }),
            Self::Concluded { .. } => Err(BallotError::VotingAlreadyEnded),
        }
    }

    /// The frozen winner.
    ///
    /// Rejected while voting is still open.
    pub fn winner(&self) -> BallotResult<&Candidate> {
        match self {
            Self::Open => Err(BallotError::VotingNotEnded),
            Self::Concluded { winner } => Ok(winner),
        }
    }
}
