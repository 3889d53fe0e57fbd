//! # Engine Errors
//!
//! Error types for the ballot engine command surface.

use thiserror::Error;

use crate::storage::StoreError;

/// Result type for engine operations
pub type BallotResult<T> = Result<T, BallotError>;

/// Rejected-command taxonomy for the ballot engine.
///
/// Every variant except `Storage` is a validation rejection: the command was
/// refused before any state mutation or event emission, and the caller may
/// correct and resubmit. `Storage` surfaces a failure in the injected store;
/// in-memory state is likewise untouched.
#[derive(Debug, Error)]
pub enum BallotError {
    // ==================
    // Access Control
    // ==================
    /// Caller is not the engine owner.
    #[error("caller is not the owner")]
    NotOwner,

    /// Caller is not a registered voter.
    #[error("caller is not a registered voter")]
    NotRegisteredVoter,

    // ==================
    // Vote Casting
    // ==================
    /// Caller has already cast their single vote.
    #[error("caller has already voted")]
    AlreadyVoted,

    /// Candidate id does not reference a registered candidate.
    #[error("invalid candidate id: {candidate_id}")]
    InvalidCandidate { candidate_id: u32 },

    // ==================
    // Lifecycle
    // ==================
    /// Voting has been concluded; no further mutation is possible.
    #[error("voting has already ended")]
    VotingAlreadyEnded,

    /// Voting has not been concluded yet.
    #[error("voting has not ended")]
    VotingNotEnded,

    // ==================
    // Tally
    // ==================
    /// No candidates are registered.
    #[error("no candidates registered")]
    NoCandidates,

    // ==================
    // Internal
    // ==================
    /// The injected state store failed.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl BallotError {
    /// Stable code for structured logging and external reporting.
    pub fn code(&self) -> &'static str {
        match self {
            BallotError::NotOwner => "NOT_OWNER",
            BallotError::NotRegisteredVoter => "NOT_REGISTERED_VOTER",
            BallotError::AlreadyVoted => "ALREADY_VOTED",
            BallotError::InvalidCandidate { .. } => "INVALID_CANDIDATE",
            BallotError::VotingAlreadyEnded => "VOTING_ALREADY_ENDED",
            BallotError::VotingNotEnded => "VOTING_NOT_ENDED",
            BallotError::NoCandidates => "NO_CANDIDATES",
            BallotError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// True for validation rejections, false for internal failures.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, BallotError::Storage(_))
    }
}
