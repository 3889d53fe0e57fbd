//! Candidate and voter registries.
//!
//! Candidate ids are dense integers `0..count()` with no gaps: the vec index
//! IS the id. Voter entries are keyed by identity and never removed within
//! an election cycle.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::identity::IdentityToken;

use super::errors::{BallotError, BallotResult};

/// A registered candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Dense sequential id, assigned at registration. Immutable.
    pub id: u32,

    /// Short display identifier. Immutable.
    pub name: String,

    /// Identity the candidate runs under. Immutable.
    pub address: IdentityToken,

    /// Accumulated votes; only ever incremented.
    pub votes_count: u32,
}

/// Candidate records indexed by their dense id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateRegistry {
    candidates: Vec<Candidate>,
}

impl CandidateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from previously persisted records.
    ///
    /// Records must have been produced by this registry: ids dense and in
    /// ascending order.
    pub fn from_candidates(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    /// Register a new candidate and return its assigned id.
    ///
    /// Exhausting the u32 id space is a programmer error, not a runtime
    /// condition.
    pub fn add(&mut self, address: IdentityToken, name: impl Into<String>) -> u32 {
        let id = u32::try_from(self.candidates.len()).expect("candidate id space exhausted");
        self.candidates.push(Candidate {
            id,
            name: name.into(),
            address,
            votes_count: 0,
        });
        id
    }

    /// Look up a candidate by id.
    pub fn get(&self, id: u32) -> BallotResult<&Candidate> {
        self.candidates
            .get(id as usize)
            .ok_or(BallotError::InvalidCandidate { candidate_id: id })
    }

    /// Increment a candidate's tally by one.
    pub fn record_vote(&mut self, id: u32) -> BallotResult<()> {
        let candidate = self
            .candidates
            .get_mut(id as usize)
            .ok_or(BallotError::InvalidCandidate { candidate_id: id })?;
        candidate.votes_count += 1;
        Ok(())
    }

    /// All candidates in ascending id order.
    pub fn list(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Number of registered candidates (equals the next id to assign).
    pub fn count(&self) -> u32 {
        self.candidates.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// True iff `id` references a registered candidate.
    pub fn contains(&self, id: u32) -> bool {
        (id as usize) < self.candidates.len()
    }
}

/// Registration and voting status for one identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterStatus {
    pub is_registered: bool,
    pub has_voted: bool,
}

/// Authorized voters keyed by identity.
#[derive(Debug, Clone, Default)]
pub struct VoterRegistry {
    voters: HashMap<IdentityToken, VoterStatus>,
    registration_events: u32,
}

impl VoterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from previously persisted parts.
    pub fn from_parts(
        voters: HashMap<IdentityToken, VoterStatus>,
        registration_events: u32,
    ) -> Self {
        Self {
            voters,
            registration_events,
        }
    }

    /// Authorize an identity to vote.
    ///
    /// Re-registration is a no-op overwrite, not an error, but it still
    /// bumps the registration-event counter: the counter tracks register
    /// calls, not distinct voters.
    pub fn register(&mut self, address: IdentityToken) {
        let entry = self.voters.entry(address).or_default();
        entry.is_registered = true;
        self.registration_events += 1;
    }

    /// Status for an identity; unknown identities report both facts false.
    pub fn status(&self, address: &IdentityToken) -> VoterStatus {
        self.voters.get(address).copied().unwrap_or_default()
    }

    pub fn is_registered(&self, address: &IdentityToken) -> bool {
        self.status(address).is_registered
    }

    pub fn has_voted(&self, address: &IdentityToken) -> bool {
        self.status(address).has_voted
    }

    /// Record that an identity has cast its vote.
    pub fn mark_voted(&mut self, address: &IdentityToken) {
        if let Some(entry) = self.voters.get_mut(address) {
            entry.has_voted = true;
        }
    }

    /// Monotonic count of registration events. Informational only.
    pub fn registration_events(&self) -> u32 {
        self.registration_events
    }

    /// The underlying entries, for persistence.
    pub fn entries(&self) -> &HashMap<IdentityToken, VoterStatus> {
        &self.voters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_ids_are_dense_and_sequential() {
        let mut registry = CandidateRegistry::new();
        for expected in 0..5u32 {
            let id = registry.add(IdentityToken::new(), format!("candidate-{expected}"));
            assert_eq!(id, expected);
        }

        assert_eq!(registry.count(), 5);
        for (index, candidate) in registry.list().iter().enumerate() {
            assert_eq!(candidate.id, index as u32);
        }
    }

    #[test]
    fn test_new_candidate_starts_at_zero_votes() {
        let mut registry = CandidateRegistry::new();
        let id = registry.add(IdentityToken::new(), "Alice");

        let candidate = registry.get(id).unwrap();
        assert_eq!(candidate.name, "Alice");
        assert_eq!(candidate.votes_count, 0);
    }

    #[test]
    fn test_get_out_of_range_is_invalid() {
        let mut registry = CandidateRegistry::new();
        registry.add(IdentityToken::new(), "Alice");

        // the id equal to count references a non-existent slot
        assert!(matches!(
            registry.get(1).unwrap_err(),
            BallotError::InvalidCandidate { candidate_id: 1 }
        ));
    }

    #[test]
    fn test_record_vote_increments_by_one() {
        let mut registry = CandidateRegistry::new();
        let id = registry.add(IdentityToken::new(), "Alice");

        registry.record_vote(id).unwrap();
        registry.record_vote(id).unwrap();

        assert_eq!(registry.get(id).unwrap().votes_count, 2);
    }

    #[test]
    fn test_record_vote_rejects_unknown_id() {
        let mut registry = CandidateRegistry::new();
        assert!(registry.record_vote(0).is_err());
    }

    #[test]
    fn test_registration_is_idempotent_but_counted() {
        let voter = IdentityToken::new();
        let mut registry = VoterRegistry::new();

        registry.register(voter);
        registry.register(voter);

        assert!(registry.is_registered(&voter));
        assert!(!registry.has_voted(&voter));
        assert_eq!(registry.registration_events(), 2);
        assert_eq!(registry.entries().len(), 1);
    }

    #[test]
    fn test_reregistration_does_not_reset_voted_flag() {
        let voter = IdentityToken::new();
        let mut registry = VoterRegistry::new();

        registry.register(voter);
        registry.mark_voted(&voter);
        registry.register(voter);

        assert!(registry.has_voted(&voter));
    }

    #[test]
    fn test_unknown_identity_reports_both_false() {
        let registry = VoterRegistry::new();
        let status = registry.status(&IdentityToken::new());

        assert!(!status.is_registered);
        assert!(!status.has_voted);
    }
}
