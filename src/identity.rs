//! # Opaque Caller Identities
//!
//! Identity resolution happens outside the engine: the calling layer
//! authenticates a caller and hands the engine an `IdentityToken`. The
//! engine only compares tokens and uses them as map keys; it never
//! inspects them.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An opaque, externally-verified identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityToken(Uuid);

impl IdentityToken {
    /// Mint a fresh token.
    ///
    /// Real callers receive theirs from the identity layer; this is mainly
    /// for tests and local setups.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying uuid.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for IdentityToken {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for IdentityToken {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for IdentityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
