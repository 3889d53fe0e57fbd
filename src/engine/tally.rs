//! Leader computation.

use super::errors::{BallotError, BallotResult};
use super::registry::{Candidate, CandidateRegistry};

/// The current leader.
///
/// Deterministic scan in id order; the running leader is replaced only on a
/// strictly greater tally, so the earliest-registered candidate wins ties.
/// Callable at any time, including before conclusion.
pub fn current_leader(registry: &CandidateRegistry) -> BallotResult<&Candidate> {
    let candidates = registry.list();
    let mut leader = candidates.first().ok_or(BallotError::NoCandidates)?;
    for candidate in &candidates[1..] {
        if candidate.votes_count > leader.votes_count {
            leader = candidate;
        }
    }
    Ok(leader)
}
