//! Task/habit repository and ordering helpers.
//!
//! # Responsibility
//! - Hold the authoritative in-memory collections for a session.
//! - Route every mutation through a full-snapshot save.
//!
//! # Invariants
//! - Operations are synchronous; a save failure is logged and absorbed.
//! - Reorders assign dense positions `0..N-1`.

pub mod ordering;
pub mod tracker_repo;
