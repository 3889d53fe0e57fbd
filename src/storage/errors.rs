//! # Storage Errors
//!
//! Error types for the state persistence layer.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures surfaced by an injected state store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A required field was never written.
    #[error("missing field '{field}'")]
    MissingField { field: String },

    /// A stored value had an unexpected shape.
    #[error("corrupt field '{field}': {reason}")]
    CorruptField { field: String, reason: String },

    /// Internal lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    /// Stable code for structured logging.
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Io(_) => "STORE_IO",
            StoreError::Serialization(_) => "STORE_SERIALIZATION",
            StoreError::MissingField { .. } => "STORE_MISSING_FIELD",
            StoreError::CorruptField { .. } => "STORE_CORRUPT_FIELD",
            StoreError::LockPoisoned => "STORE_LOCK_POISONED",
        }
    }

    /// Shorthand for a missing required field.
    pub fn missing(field: impl Into<String>) -> Self {
        StoreError::MissingField {
            field: field.into(),
        }
    }

    /// Shorthand for a field that decoded to the wrong shape.
    pub fn corrupt(field: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::CorruptField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(StoreError::missing("owner").code(), "STORE_MISSING_FIELD");
        assert_eq!(
            StoreError::corrupt("voters", "expected object").code(),
            "STORE_CORRUPT_FIELD"
        );
        assert_eq!(StoreError::LockPoisoned.code(), "STORE_LOCK_POISONED");
    }

    #[test]
    fn test_error_messages_name_the_field() {
        let err = StoreError::corrupt("candidates", "expected array");
        assert!(err.to_string().contains("candidates"));
        assert!(err.to_string().contains("expected array"));
    }
}
