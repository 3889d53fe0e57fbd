//! # State Persistence
//!
//! The engine treats durability as an external collaborator: a key-value
//! store with per-field reads and writes. Each engine field persists under a
//! stable key from [`fields`]; the engine writes changed fields through
//! before committing a command and can rehydrate itself from a previously
//! written store.

mod errors;
mod file;
mod memory;

pub use errors::{StoreError, StoreResult};
pub use file::FileStateStore;
pub use memory::MemoryStateStore;

use serde_json::Value;

/// Stable field keys written by the engine.
pub mod fields {
    pub const OWNER: &str = "owner";
    pub const PROPOSAL_DESCRIPTION: &str = "proposal_description";
    pub const CANDIDATES: &str = "candidates";
    pub const VOTERS: &str = "voters";
    pub const TOTAL_VOTERS_COUNT: &str = "total_voters_count";
    pub const VOTING_ENDED: &str = "voting_ended";
    pub const WINNING_CANDIDATE: &str = "winning_candidate";
}

/// Per-field key-value persistence.
///
/// A completed `put` must be visible to every subsequent `get` on the same
/// store instance.
pub trait StateStore: Send + Sync {
    /// Persist one field.
    fn put(&self, field: &str, value: &Value) -> StoreResult<()>;

    /// Read one field; `None` if it was never written.
    fn get(&self, field: &str) -> StoreResult<Option<Value>>;
}
