//! In-process key-value backend.

use super::{ensure_fits, entry_chars, KeyValueStore, StoreResult};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Map-backed store with the same capacity accounting as `SqliteKvStore`.
///
/// Not `Sync`; interior mutability is a `RefCell`.
#[derive(Debug)]
pub struct MemoryKvStore {
    capacity: usize,
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: RefCell::new(BTreeMap::new()),
        }
    }

    /// Total characters currently held across all entries.
    pub fn used_chars(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .map(|(key, value)| entry_chars(key, value))
            .sum()
    }

    /// Writes `value` without capacity checks, e.g. to seed corrupted data.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl Default for MemoryKvStore {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_CAPACITY_CHARS)
    }
}

impl KeyValueStore for MemoryKvStore {
    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> StoreResult<()> {
        let used_by_others: usize = self
            .entries
            .borrow()
            .iter()
            .filter(|(existing, _)| existing.as_str() != key)
            .map(|(existing, stored)| entry_chars(existing, stored))
            .sum();
        ensure_fits(used_by_others, entry_chars(key, value), self.capacity)?;
        self.insert_raw(key, value);
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
