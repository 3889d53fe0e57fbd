//! # Ballot Events
//!
//! Append-only structured facts emitted after each successful mutating
//! command, delivered synchronously to an injected sink before the command
//! returns.

mod record;
mod sink;

pub use record::{BallotEvent, BallotEventKind};
pub use sink::{EventSink, FileEventSink, MemoryEventSink, MemoryEventSinkConfig};
