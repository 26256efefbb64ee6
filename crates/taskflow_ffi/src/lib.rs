//! Flutter-facing bindings for the TaskFlow core.

pub mod api;
