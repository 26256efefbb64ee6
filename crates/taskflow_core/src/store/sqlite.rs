//! SQLite key-value backend.
//!
//! # Invariants
//! - Connection must be migrated (`open_db` / `open_db_in_memory`).
//! - The store owns its connection, so a repository over it can live for
//!   the whole process.
//! - Capacity is checked inside the write transaction, so a rejected write
//!   never replaces the stored value.

use super::{ensure_fits, entry_chars, KeyValueStore, StoreResult};
use crate::db::open_db;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::Path;

/// Slot store over the `kv_entries` table.
pub struct SqliteKvStore {
    conn: Connection,
    capacity: usize,
}

impl SqliteKvStore {
    /// Takes ownership of a migrated connection with a character capacity.
    pub fn new(conn: Connection, capacity: usize) -> Self {
        Self { conn, capacity }
    }

    /// Opens `path` with migrations applied and wraps it as a store.
    pub fn open(path: impl AsRef<Path>, capacity: usize) -> StoreResult<Self> {
        Ok(Self::new(open_db(path)?, capacity))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Total characters currently held across all entries.
    pub fn used_chars(&self) -> StoreResult<usize> {
        used_chars_excluding(&self.conn, None)
    }
}

impl KeyValueStore for SqliteKvStore {
    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save(&self, key: &str, value: &str) -> StoreResult<()> {
        // Immediate lock so the capacity check and the write see the same rows.
        let tx = rusqlite::Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        let used = used_chars_excluding(&tx, Some(key))?;
        ensure_fits(used, entry_chars(key, value), self.capacity)?;
        tx.execute(
            "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        tx.commit()?;
        debug!(
            "event=kv_save module=store status=ok backend=sqlite key={} chars={}",
            key,
            value.chars().count()
        );
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }
}

fn used_chars_excluding(conn: &Connection, key: Option<&str>) -> StoreResult<usize> {
    // `length()` on TEXT counts characters, matching `entry_chars`.
    let used: i64 = conn.query_row(
        "SELECT COALESCE(SUM(length(key) + length(value)), 0)
         FROM kv_entries
         WHERE ?1 IS NULL OR key <> ?1;",
        [key],
        |row| row.get(0),
    )?;
    Ok(usize::try_from(used).unwrap_or(usize::MAX))
}
