//! The ballot engine.
//!
//! A single-authority state machine: one owner, explicit commands, explicit
//! rejections. Mutating commands serialize behind a writer lock; queries
//! share a read lock and observe committed state only.
//!
//! Command discipline: validate, persist changed fields, commit in memory,
//! emit the event. A rejected or failed command leaves both the in-memory
//! state and the event stream untouched.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::events::{BallotEvent, BallotEventKind, EventSink};
use crate::identity::IdentityToken;
use crate::observability::Logger;
use crate::storage::{fields, StateStore, StoreError};

use super::access;
use super::errors::{BallotError, BallotResult};
use super::lifecycle::VotingPhase;
use super::registry::{Candidate, CandidateRegistry, VoterRegistry, VoterStatus};
use super::tally;

/// Mutable engine state guarded by the instance lock.
#[derive(Debug)]
struct EngineState {
    proposal_description: String,
    candidates: CandidateRegistry,
    voters: VoterRegistry,
    phase: VotingPhase,
    next_event_sequence: u64,
}

/// The ballot engine instance handle.
///
/// The engine is the sole owner of its registries and counters; all access
/// goes through its methods.
pub struct BallotEngine {
    /// Set once at creation, immutable thereafter.
    owner: IdentityToken,
    state: RwLock<EngineState>,
    store: Arc<dyn StateStore>,
    sink: Arc<dyn EventSink>,
}

impl std::fmt::Debug for BallotEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BallotEngine")
            .field("owner", &self.owner)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl BallotEngine {
    /// Create a fresh engine owned by `owner`, seeding the injected store
    /// with its initial state.
    pub fn create(
        owner: IdentityToken,
        store: Arc<dyn StateStore>,
        sink: Arc<dyn EventSink>,
    ) -> BallotResult<Self> {
        let engine = Self {
            owner,
            state: RwLock::new(EngineState {
                proposal_description: String::new(),
                candidates: CandidateRegistry::new(),
                voters: VoterRegistry::new(),
                phase: VotingPhase::new(),
                next_event_sequence: 1,
            }),
            store,
            sink,
        };

        engine.persist(fields::OWNER, &owner)?;
        engine.persist(fields::PROPOSAL_DESCRIPTION, &String::new())?;
        engine.persist(fields::CANDIDATES, &Vec::<Candidate>::new())?;
        engine.persist(fields::VOTERS, &HashMap::<IdentityToken, VoterStatus>::new())?;
        engine.persist(fields::TOTAL_VOTERS_COUNT, &0u32)?;
        engine.persist(fields::VOTING_ENDED, &false)?;

        Logger::info("ENGINE_CREATED", &[("owner", &owner.to_string())]);
        Ok(engine)
    }

    /// Rehydrate an engine from a previously written store.
    ///
    /// Event sequence numbers restart at 1: they order events within one
    /// engine instance, not across restarts.
    pub fn open(store: Arc<dyn StateStore>, sink: Arc<dyn EventSink>) -> BallotResult<Self> {
        let owner: IdentityToken = read_required(store.as_ref(), fields::OWNER)?;
        let proposal_description: String =
            read_or(store.as_ref(), fields::PROPOSAL_DESCRIPTION, String::new())?;
        let candidates: Vec<Candidate> = read_or(store.as_ref(), fields::CANDIDATES, Vec::new())?;
        let voters: HashMap<IdentityToken, VoterStatus> =
            read_or(store.as_ref(), fields::VOTERS, HashMap::new())?;
        let total_voters_count: u32 = read_or(store.as_ref(), fields::TOTAL_VOTERS_COUNT, 0)?;
        let voting_ended: bool = read_or(store.as_ref(), fields::VOTING_ENDED, false)?;

        let phase = if voting_ended {
            let winner: Candidate = read_required(store.as_ref(), fields::WINNING_CANDIDATE)?;
            VotingPhase::Concluded { winner }
        } else {
            VotingPhase::Open
        };

        let engine = Self {
            owner,
            state: RwLock::new(EngineState {
                proposal_description,
                candidates: CandidateRegistry::from_candidates(candidates),
                voters: VoterRegistry::from_parts(voters, total_voters_count),
                phase,
                next_event_sequence: 1,
            }),
            store,
            sink,
        };

        Logger::info("ENGINE_OPENED", &[("owner", &owner.to_string())]);
        Ok(engine)
    }

    // =========================================================================
    // COMMANDS
    // =========================================================================

    /// Register a candidate. Owner only.
    ///
    /// Returns the assigned dense id.
    pub fn add_candidate(
        &self,
        caller: &IdentityToken,
        address: IdentityToken,
        name: impl Into<String>,
    ) -> BallotResult<u32> {
        let name = name.into();
        let mut state = self.write_state();

        if let Err(err) = access::require_owner(&self.owner, caller) {
            self.log_rejection("add_candidate", &err);
            return Err(err);
        }

        let mut candidates = state.candidates.clone();
        let id = candidates.add(address, name.clone());
        self.persist(fields::CANDIDATES, &candidates)?;
        state.candidates = candidates;

        let event = Self::next_event(
            &mut state,
            BallotEventKind::CandidateAdded { id, address, name },
        );
        self.deliver(&event);
        Ok(id)
    }

    /// Authorize an identity to vote. Owner only.
    ///
    /// Re-registration is accepted and counted as another registration
    /// event.
    pub fn register_voter(
        &self,
        caller: &IdentityToken,
        address: IdentityToken,
    ) -> BallotResult<()> {
        let mut state = self.write_state();

        if let Err(err) = access::require_owner(&self.owner, caller) {
            self.log_rejection("register_voter", &err);
            return Err(err);
        }

        let mut voters = state.voters.clone();
        voters.register(address);
        self.persist(fields::VOTERS, voters.entries())?;
        self.persist(fields::TOTAL_VOTERS_COUNT, &voters.registration_events())?;
        state.voters = voters;

        let event = Self::next_event(&mut state, BallotEventKind::VoterRegistered { address });
        self.deliver(&event);
        Ok(())
    }

    /// Cast the caller's single vote for `candidate_id`.
    pub fn cast_vote(&self, caller: &IdentityToken, candidate_id: u32) -> BallotResult<()> {
        let mut state = self.write_state();

        if let Err(err) = Self::validate_vote(&state, caller, candidate_id) {
            self.log_rejection("cast_vote", &err);
            return Err(err);
        }

        let mut candidates = state.candidates.clone();
        candidates.record_vote(candidate_id)?;
        let mut voters = state.voters.clone();
        voters.mark_voted(caller);

        self.persist(fields::CANDIDATES, &candidates)?;
        self.persist(fields::VOTERS, voters.entries())?;
        state.candidates = candidates;
        state.voters = voters;

        let event = Self::next_event(
            &mut state,
            BallotEventKind::Voted {
                candidate_id,
                voter: *caller,
            },
        );
        self.deliver(&event);
        Ok(())
    }

    /// Replace the proposal text. Owner only. No event is emitted.
    pub fn set_proposal_description(
        &self,
        caller: &IdentityToken,
        text: impl Into<String>,
    ) -> BallotResult<()> {
        let text = text.into();
        let mut state = self.write_state();

        if let Err(err) = access::require_owner(&self.owner, caller) {
            self.log_rejection("set_proposal_description", &err);
            return Err(err);
        }

        self.persist(fields::PROPOSAL_DESCRIPTION, &text)?;
        state.proposal_description = text;

        Logger::info("PROPOSAL_DESCRIPTION_SET", &[]);
        Ok(())
    }

    /// End voting and freeze the winner. Owner only; terminal.
    ///
    /// Returns the frozen winner.
    pub fn conclude_voting(&self, caller: &IdentityToken) -> BallotResult<Candidate> {
        let mut state = self.write_state();

        let winner = match Self::validate_conclude(&state, &self.owner, caller) {
            Ok(winner) => winner,
            Err(err) => {
                self.log_rejection("conclude_voting", &err);
                return Err(err);
            }
        };

        let concluded = state.phase.clone().conclude(winner.clone())?;
        self.persist(fields::VOTING_ENDED, &true)?;
        self.persist(fields::WINNING_CANDIDATE, &winner)?;
        state.phase = concluded;

        let event = Self::next_event(
            &mut state,
            BallotEventKind::VotingEnded {
                winner_id: winner.id,
                winner_address: winner.address,
            },
        );
        self.deliver(&event);
        Ok(winner)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn get_owner(&self) -> IdentityToken {
        self.owner
    }

    /// The candidate record for `id`.
    pub fn get_candidate(&self, id: u32) -> BallotResult<Candidate> {
        self.read_state().candidates.get(id).cloned()
    }

    /// All candidates in ascending id order.
    pub fn list_candidates(&self) -> Vec<Candidate> {
        self.read_state().candidates.list().to_vec()
    }

    /// The current leader; see [`tally::current_leader`] for the rule.
    pub fn current_leader(&self) -> BallotResult<Candidate> {
        let state = self.read_state();
        tally::current_leader(&state.candidates).cloned()
    }

    /// The frozen winner. Rejected while voting is still open.
    pub fn get_winner(&self) -> BallotResult<Candidate> {
        self.read_state().phase.winner().cloned()
    }

    pub fn get_proposal_description(&self) -> String {
        self.read_state().proposal_description.clone()
    }

    /// Number of registered candidates.
    pub fn candidate_count(&self) -> u32 {
        self.read_state().candidates.count()
    }

    /// Monotonic count of registration events, not distinct voters.
    pub fn total_voters(&self) -> u32 {
        self.read_state().voters.registration_events()
    }

    /// Registration and voting status for an identity; both facts are false
    /// for an unknown identity.
    pub fn voter_status(&self, address: &IdentityToken) -> VoterStatus {
        self.read_state().voters.status(address)
    }

    pub fn is_voting_open(&self) -> bool {
        self.read_state().phase.is_open()
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    /// Vote preconditions, in the fixed order that decides which error a
    /// caller sees: registration, repeat vote, lifecycle, candidate
    /// validity.
    fn validate_vote(
        state: &EngineState,
        caller: &IdentityToken,
        candidate_id: u32,
    ) -> BallotResult<()> {
        access::require_registered_voter(&state.voters, caller)?;
        if state.voters.has_voted(caller) {
            return Err(BallotError::AlreadyVoted);
        }
        if state.phase.is_concluded() {
            return Err(BallotError::VotingAlreadyEnded);
        }
        if !state.candidates.contains(candidate_id) {
            return Err(BallotError::InvalidCandidate { candidate_id });
        }
        Ok(())
    }

    fn validate_conclude(
        state: &EngineState,
        owner: &IdentityToken,
        caller: &IdentityToken,
    ) -> BallotResult<Candidate> {
        access::require_owner(owner, caller)?;
        if state.phase.is_concluded() {
            return Err(BallotError::VotingAlreadyEnded);
        }
        tally::current_leader(&state.candidates).cloned()
    }

    fn next_event(state: &mut EngineState, kind: BallotEventKind) -> BallotEvent {
        let sequence = state.next_event_sequence;
        state.next_event_sequence += 1;
        BallotEvent::new(sequence, kind)
    }

    /// Hand an event to the sink, still under the writer lock so delivery
    /// order matches sequence order.
    fn deliver(&self, event: &BallotEvent) {
        Logger::info(
            event.kind.as_str(),
            &[("sequence", &event.sequence.to_string())],
        );
        if let Err(err) = self.sink.emit(event) {
            Logger::error(
                "EVENT_DELIVERY_FAILED",
                &[
                    ("sequence", &event.sequence.to_string()),
                    ("error", &err.to_string()),
                ],
            );
        }
    }

    fn persist<T: Serialize>(&self, field: &'static str, value: &T) -> BallotResult<()> {
        let encoded = serde_json::to_value(value).map_err(StoreError::Serialization)?;
        if let Err(err) = self.store.put(field, &encoded) {
            Logger::error("STATE_WRITE_FAILED", &[("field", field), ("code", err.code())]);
            return Err(err.into());
        }
        Ok(())
    }

    fn log_rejection(&self, command: &str, err: &BallotError) {
        Logger::warn(
            "COMMAND_REJECTED",
            &[("code", err.code()), ("command", command)],
        );
    }

    // A poisoned lock means a prior panic mid-command; unrecoverable.
    fn read_state(&self) -> RwLockReadGuard<'_, EngineState> {
        self.state.read().expect("engine state lock poisoned")
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, EngineState> {
        self.state.write().expect("engine state lock poisoned")
    }
}

fn read_required<T: DeserializeOwned>(store: &dyn StateStore, field: &str) -> BallotResult<T> {
    match store.get(field)? {
        Some(value) => decode(field, value),
        None => Err(StoreError::missing(field).into()),
    }
}

fn read_or<T: DeserializeOwned>(
    store: &dyn StateStore,
    field: &str,
    default: T,
) -> BallotResult<T> {
    match store.get(field)? {
        Some(value) => decode(field, value),
        None => Ok(default),
    }
}

fn decode<T: DeserializeOwned>(field: &str, value: serde_json::Value) -> BallotResult<T> {
    serde_json::from_value(value)
        .map_err(|err| StoreError::corrupt(field, err.to_string()).into())
}
