//! Domain model for task and habit tracking.
//!
//! # Responsibility
//! - Define the canonical task/habit records persisted in store slots.
//! - Keep icon shape mutually exclusive by construction.
//!
//! # Invariants
//! - Every entity is identified by a stable UUID that is never reused.
//! - `position` is a manual display order, dense `0..N-1` after a reorder.
//! - A habit holds at most one completion record per calendar date.

pub mod habit;
pub mod icon;
pub mod task;
