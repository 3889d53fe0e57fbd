//! # Observability
//!
//! Structured command logging. Diagnostic output only; the event stream in
//! [`crate::events`] is the authoritative record of what happened.

mod logger;

pub use logger::{Logger, Severity};
