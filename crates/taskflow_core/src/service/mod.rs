//! Derived-state services over the tracker collections.
//!
//! # Responsibility
//! - Compute habit completion and streaks (`streak`).
//! - Project collections into display-ready views (`view_model`, `stats`,
//!   `date_strip`).
//!
//! # Invariants
//! - Every function is pure and takes `today` explicitly.

pub mod date_strip;
pub mod stats;
pub mod streak;
pub mod view_model;
