//! Local store adapter.
//!
//! # Responsibility
//! - Define the key-value contract slot snapshots are persisted through.
//! - Provide SQLite and in-memory backends with the same capacity semantics.
//! - Serialize whole collections into named slots and recover from bad data.
//!
//! # Invariants
//! - Capacity is measured in characters across every key and value.
//! - A write that would exceed capacity fails with `QuotaExceeded` and leaves
//!   the previous value in place.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod snapshot;
pub mod sqlite;

pub use memory::MemoryKvStore;
pub use snapshot::{SaveOutcome, SnapshotStore, HABITS_SLOT, TASKS_SLOT};
pub use sqlite::SqliteKvStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by key-value store backends.
#[derive(Debug)]
pub enum StoreError {
    /// The write needs `required` characters but only `available` remain.
    QuotaExceeded { required: usize, available: usize },
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Snapshot could not be serialized.
    Encode(serde_json::Error),
}

impl StoreError {
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuotaExceeded {
                required,
                available,
            } => write!(
                f,
                "store quota exceeded: write needs {required} chars, {available} available"
            ),
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "snapshot encode failed: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::QuotaExceeded { .. } => None,
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Text key-value store with a bounded total size.
pub trait KeyValueStore {
    /// Loads the value stored under `key`, if any.
    fn load(&self, key: &str) -> StoreResult<Option<String>>;
    /// Stores `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &str) -> StoreResult<()>;
    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).save(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}

/// Character-equivalent footprint of one entry.
pub(crate) fn entry_chars(key: &str, value: &str) -> usize {
    key.chars().count() + value.chars().count()
}

/// Checks that an entry of `required` chars fits next to `used` chars.
pub(crate) fn ensure_fits(used: usize, required: usize, capacity: usize) -> StoreResult<()> {
    let available = capacity.saturating_sub(used);
    if required > available {
        return Err(StoreError::QuotaExceeded {
            required,
            available,
        });
    }
    Ok(())
}
