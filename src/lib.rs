//! ballot-engine - a strict, deterministic, single-authority ballot and
//! tally engine
//!
//! One owner registers candidates and voters; each registered voter casts a
//! single vote; conclusion freezes the winner. Every command validates
//! access-control and lifecycle rules before touching state, writes changed
//! fields through an injected store, and emits a structured event.

pub mod engine;
pub mod events;
pub mod identity;
pub mod observability;
pub mod storage;
