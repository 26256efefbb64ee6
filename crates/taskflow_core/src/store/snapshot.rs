//! Whole-collection snapshots persisted in named slots.
//!
//! # Responsibility
//! - Serialize task and habit collections as JSON arrays.
//! - Recover from corrupted slots by clearing them.
//! - Apply the icon-stripping degrade policy when a habits save hits quota.
//!
//! # Invariants
//! - Loads never fail: unreadable slots yield an empty collection.
//! - Saves never fail: the worst case is a dropped save cycle.
//! - Degrading only touches the serialized copy, never the caller's data.

use super::{KeyValueStore, StoreError};
use crate::config::TrackerConfig;
use crate::model::habit::Habit;
use crate::model::task::Task;
use log::{error, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Slot holding the task collection.
pub const TASKS_SLOT: &str = "taskflow_tasks";
/// Slot holding the habit collection with embedded completions.
pub const HABITS_SLOT: &str = "taskflow_habits";

/// Result of one save cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Snapshot persisted as-is.
    Saved,
    /// Snapshot persisted after stripping oversized icons from the copy.
    SavedDegraded { stripped_icons: usize },
    /// Snapshot was not persisted this cycle.
    Dropped,
}

impl SaveOutcome {
    pub fn is_persisted(self) -> bool {
        !matches!(self, Self::Dropped)
    }
}

/// Snapshot codec over a key-value backend.
pub struct SnapshotStore<S: KeyValueStore> {
    store: S,
    icon_load_limit: usize,
    icon_degrade_limit: usize,
}

impl<S: KeyValueStore> SnapshotStore<S> {
    pub fn new(store: S, config: &TrackerConfig) -> Self {
        Self {
            store,
            icon_load_limit: config.icon_load_limit_chars,
            icon_degrade_limit: config.icon_degrade_limit_chars,
        }
    }

    /// Borrows the underlying backend.
    pub fn backend(&self) -> &S {
        &self.store
    }

    /// Loads the task collection; corrupted data yields an empty collection.
    pub fn load_tasks(&self) -> Vec<Task> {
        self.load_slot(TASKS_SLOT)
    }

    /// Loads the habit collection and drops image icons above the load limit.
    pub fn load_habits(&self) -> Vec<Habit> {
        let mut habits: Vec<Habit> = self.load_slot(HABITS_SLOT);
        let stripped = habits
            .iter_mut()
            .map(|habit| habit.strip_oversized_icon(self.icon_load_limit))
            .filter(|stripped| *stripped)
            .count();
        if stripped > 0 {
            info!(
                "event=snapshot_load module=store status=degraded slot={} stripped_icons={}",
                HABITS_SLOT, stripped
            );
        }
        habits
    }

    /// Persists the full task collection.
    pub fn save_tasks(&self, tasks: &[Task]) -> SaveOutcome {
        match self.write_slot(TASKS_SLOT, tasks) {
            Ok(()) => SaveOutcome::Saved,
            Err(err) => {
                error!(
                    "event=snapshot_save module=store status=error slot={} error={}",
                    TASKS_SLOT, err
                );
                SaveOutcome::Dropped
            }
        }
    }

    /// Persists the full habit collection, degrading icons once on quota errors.
    pub fn save_habits(&self, habits: &[Habit]) -> SaveOutcome {
        let err = match self.write_slot(HABITS_SLOT, habits) {
            Ok(()) => return SaveOutcome::Saved,
            Err(err) => err,
        };
        error!(
            "event=snapshot_save module=store status=error slot={} error={}",
            HABITS_SLOT, err
        );
        if !err.is_quota_exceeded() {
            return SaveOutcome::Dropped;
        }

        let mut reduced = habits.to_vec();
        let stripped_icons = reduced
            .iter_mut()
            .map(|habit| habit.strip_oversized_icon(self.icon_degrade_limit))
            .filter(|stripped| *stripped)
            .count();
        match self.write_slot(HABITS_SLOT, &reduced) {
            Ok(()) => {
                warn!(
                    "event=snapshot_save module=store status=degraded slot={} stripped_icons={}",
                    HABITS_SLOT, stripped_icons
                );
                SaveOutcome::SavedDegraded { stripped_icons }
            }
            Err(retry_err) => {
                error!(
                    "event=snapshot_save module=store status=dropped slot={} stripped_icons={} error={}",
                    HABITS_SLOT, stripped_icons, retry_err
                );
                SaveOutcome::Dropped
            }
        }
    }

    fn load_slot<T: DeserializeOwned>(&self, slot: &'static str) -> Vec<T> {
        let raw = match self.store.load(slot) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                error!(
                    "event=snapshot_load module=store status=error slot={} error={}",
                    slot, err
                );
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => items,
            Err(err) => {
                warn!(
                    "event=snapshot_load module=store status=corrupt slot={} line={} column={}",
                    slot,
                    err.line(),
                    err.column()
                );
                if let Err(remove_err) = self.store.remove(slot) {
                    error!(
                        "event=snapshot_clear module=store status=error slot={} error={}",
                        slot, remove_err
                    );
                }
                Vec::new()
            }
        }
    }

    fn write_slot<T: Serialize>(&self, slot: &str, items: &[T]) -> Result<(), StoreError> {
        let payload = serde_json::to_string(items)?;
        self.store.save(slot, &payload)
    }
}

#[cfg(test)]
mod tests {
    use super::{SaveOutcome, SnapshotStore, HABITS_SLOT};
    use crate::config::TrackerConfig;
    use crate::model::habit::{Habit, HabitColor};
    use crate::model::icon::{Icon, IconShape};
    use crate::store::{KeyValueStore, MemoryKvStore};
    use chrono::{TimeZone, Utc};

    fn habit(title: &str, icon: Icon) -> Habit {
        Habit::new(
            title,
            icon,
            HabitColor::Blue,
            0,
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        )
    }

    fn image(chars: usize) -> Icon {
        Icon::image("x".repeat(chars), IconShape::Square)
    }

    #[test]
    fn load_counts_and_replaces_only_oversized_icons() {
        let store = MemoryKvStore::default();
        let habits = vec![
            habit("a", image(40)),
            habit("b", Icon::emoji("📚")),
            habit("c", image(41)),
            habit("d", image(90)),
        ];
        store.insert_raw(HABITS_SLOT, &serde_json::to_string(&habits).unwrap());
        let config = TrackerConfig {
            icon_load_limit_chars: 40,
            ..TrackerConfig::default()
        };

        let loaded = SnapshotStore::new(&store, &config).load_habits();

        let icons = loaded.iter().map(|h| h.icon.clone()).collect::<Vec<_>>();
        assert_eq!(
            icons,
            vec![image(40), Icon::emoji("📚"), Icon::default(), Icon::default()]
        );
    }

    #[test]
    fn degraded_save_reports_each_stripped_icon() {
        let habits = vec![
            habit("a", image(500)),
            habit("b", image(10)),
            habit("c", image(600)),
        ];
        let store = MemoryKvStore::new(900);
        let config = TrackerConfig {
            icon_degrade_limit_chars: 100,
            ..TrackerConfig::default()
        };

        let outcome = SnapshotStore::new(&store, &config).save_habits(&habits);

        assert_eq!(outcome, SaveOutcome::SavedDegraded { stripped_icons: 2 });
        let persisted = store.load(HABITS_SLOT).unwrap().unwrap();
        assert!(!persisted.contains(&"x".repeat(100)));
        assert!(persisted.contains(&"x".repeat(10)));
    }
}
