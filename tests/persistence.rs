//! Persistence tests: write-through and rehydration.
//!
//! The engine persists changed fields through the injected store on every
//! successful command; a fresh engine opened on the same store must observe
//! the identical election.

use std::sync::Arc;

use ballot_engine::engine::{BallotEngine, BallotError};
use ballot_engine::events::{FileEventSink, MemoryEventSink};
use ballot_engine::identity::IdentityToken;
use ballot_engine::storage::{FileStateStore, MemoryStateStore};
use tempfile::tempdir;

// =============================================================================
// REHYDRATION
// =============================================================================

#[test]
fn test_rehydrated_engine_observes_the_same_election() {
    let store = Arc::new(MemoryStateStore::new());
    let owner = IdentityToken::new();
    let voter = IdentityToken::new();

    let engine = BallotEngine::create(
        owner,
        store.clone(),
        Arc::new(MemoryEventSink::default()),
    )
    .unwrap();
    engine
        .set_proposal_description(&owner, "City council election")
        .unwrap();
    engine
        .add_candidate(&owner, IdentityToken::new(), "Alice")
        .unwrap();
    engine.register_voter(&owner, voter).unwrap();
    engine.cast_vote(&voter, 0).unwrap();
    drop(engine);

    let reopened =
        BallotEngine::open(store, Arc::new(MemoryEventSink::default())).unwrap();

    assert_eq!(reopened.get_owner(), owner);
    assert_eq!(reopened.get_proposal_description(), "City council election");
    assert_eq!(reopened.candidate_count(), 1);
    assert_eq!(reopened.get_candidate(0).unwrap().votes_count, 1);
    assert_eq!(reopened.total_voters(), 1);
    assert!(reopened.is_voting_open());
}

#[test]
fn test_rehydrated_voter_flags_still_bind() {
    let store = Arc::new(MemoryStateStore::new());
    let owner = IdentityToken::new();
    let voter = IdentityToken::new();

    let engine = BallotEngine::create(
        owner,
        store.clone(),
        Arc::new(MemoryEventSink::default()),
    )
    .unwrap();
    engine
        .add_candidate(&owner, IdentityToken::new(), "Alice")
        .unwrap();
    engine.register_voter(&owner, voter).unwrap();
    engine.cast_vote(&voter, 0).unwrap();
    drop(engine);

    let reopened =
        BallotEngine::open(store, Arc::new(MemoryEventSink::default())).unwrap();

    let status = reopened.voter_status(&voter);
    assert!(status.is_registered);
    assert!(status.has_voted);
    assert!(matches!(
        reopened.cast_vote(&voter, 0).unwrap_err(),
        BallotError::AlreadyVoted
    ));
}

#[test]
fn test_rehydrated_concluded_engine_keeps_the_winner() {
    let store = Arc::new(MemoryStateStore::new());
    let owner = IdentityToken::new();

    let engine = BallotEngine::create(
        owner,
        store.clone(),
        Arc::new(MemoryEventSink::default()),
    )
    .unwrap();
    engine
        .add_candidate(&owner, IdentityToken::new(), "Alice")
        .unwrap();
    let voter = IdentityToken::new();
    engine.register_voter(&owner, voter).unwrap();
    engine.cast_vote(&voter, 0).unwrap();
    let winner = engine.conclude_voting(&owner).unwrap();
    drop(engine);

    let reopened =
        BallotEngine::open(store, Arc::new(MemoryEventSink::default())).unwrap();

    assert!(!reopened.is_voting_open());
    assert_eq!(reopened.get_winner().unwrap(), winner);
    assert!(matches!(
        reopened.conclude_voting(&owner).unwrap_err(),
        BallotError::VotingAlreadyEnded
    ));
}

#[test]
fn test_open_on_empty_store_is_rejected() {
    let result = BallotEngine::open(
        Arc::new(MemoryStateStore::new()),
        Arc::new(MemoryEventSink::default()),
    );

    assert!(matches!(result.unwrap_err(), BallotError::Storage(_)));
}

// =============================================================================
// FILE-BACKED STORE AND SINK
// =============================================================================

#[test]
fn test_file_store_survives_process_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("election.json");
    let owner = IdentityToken::new();

    {
        let store = Arc::new(FileStateStore::open(&path).unwrap());
        let engine =
            BallotEngine::create(owner, store, Arc::new(MemoryEventSink::default())).unwrap();
        engine
            .add_candidate(&owner, IdentityToken::new(), "Alice")
            .unwrap();
        engine
            .add_candidate(&owner, IdentityToken::new(), "Bob")
            .unwrap();
    }

    let store = Arc::new(FileStateStore::open(&path).unwrap());
    let reopened = BallotEngine::open(store, Arc::new(MemoryEventSink::default())).unwrap();

    assert_eq!(reopened.get_owner(), owner);
    let names: Vec<String> = reopened
        .list_candidates()
        .into_iter()
        .map(|candidate| candidate.name)
        .collect();
    assert_eq!(names, ["Alice", "Bob"]);
}

#[test]
fn test_file_sink_records_the_full_election() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    let owner = IdentityToken::new();

    let sink = Arc::new(FileEventSink::open(&path).unwrap());
    let engine =
        BallotEngine::create(owner, Arc::new(MemoryStateStore::new()), sink).unwrap();
    engine
        .add_candidate(&owner, IdentityToken::new(), "Alice")
        .unwrap();
    let voter = IdentityToken::new();
    engine.register_voter(&owner, voter).unwrap();
    engine.cast_vote(&voter, 0).unwrap();
    engine.conclude_voting(&owner).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let codes: Vec<String> = contents
        .lines()
        .map(|line| {
            let record: serde_json::Value = serde_json::from_str(line).unwrap();
            record["type"].as_str().unwrap().to_string()
        })
        .collect();

    assert_eq!(
        codes,
        [
            "candidate_added",
            "voter_registered",
            "voted",
            "voting_ended"
        ]
    );
}
