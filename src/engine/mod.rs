//! # Ballot Engine Core
//!
//! Command validation, registries, tally, and lifecycle rules. Everything
//! mutating goes through [`BallotEngine`]; a rejected command leaves state
//! untouched.

mod access;
mod engine;
mod errors;
mod lifecycle;
mod registry;
mod tally;

pub use engine::BallotEngine;
pub use errors::{BallotError, BallotResult};
pub use lifecycle::VotingPhase;
pub use registry::{Candidate, CandidateRegistry, VoterRegistry, VoterStatus};
pub use tally::current_leader;
