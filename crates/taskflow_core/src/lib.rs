//! Core domain logic for TaskFlow.
//! This crate is the single source of truth for task/habit invariants,
//! derived habit state and local snapshot persistence.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, StreakPolicy, TrackerConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::habit::{Habit, HabitColor, HabitCompletion, HabitId, HabitPatch};
pub use model::icon::{Icon, IconShape};
pub use model::task::{Task, TaskId, TaskPatch};
pub use repo::ordering::{arrange_by_ids, move_item};
pub use repo::tracker_repo::TrackerRepository;
pub use service::date_strip::{date_strip, StripDay};
pub use service::stats::{tracker_stats, TrackerStats};
pub use service::streak::{compute_streak, is_completed_on, toggle_on};
pub use service::view_model::{
    completion_grid, habit_list_view, is_task_visible_on, task_list_view, GridDay,
};
pub use store::{
    KeyValueStore, MemoryKvStore, SaveOutcome, SnapshotStore, SqliteKvStore, StoreError,
    StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
