//! SQLite key-value adapter.
//!
//! The on-device durable store. One connection guarded by a mutex; every
//! adapter call runs to completion on the calling task, batch writes run in
//! a single transaction.

use crate::error::Result;
use crate::storage::adapter::KeyValueStore;
use crate::storage::schema::apply_schema;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;

/// SQLite-based key-value store.
#[derive(Debug)]
pub struct SqliteKvStore {
    conn: Mutex<Connection>,
}

impl SqliteKvStore {
    /// Open a database at the given path.
    ///
    /// Creates the parent directory, the database and the schema if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, None)
    }

    /// Open a database with an optional busy timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open_with_timeout(path: &Path, timeout_ms: Option<u64>) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        // Default 5 second timeout
        conn.busy_timeout(Duration::from_millis(timeout_ms.unwrap_or(5000)))?;

        apply_schema(&conn)?;
        debug!(path = %path.display(), "Opened key-value store");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn get_sync(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn()
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set_many_sync(&self, pairs: &[(String, String)]) -> Result<()> {
        let now = chrono::Utc::now().timestamp_millis();
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            )?;
            for (key, value) in pairs {
                stmt.execute(rusqlite::params![key, value, now])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn remove_many_sync(&self, keys: &[String]) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached("DELETE FROM kv WHERE key = ?1")?;
            for key in keys {
                stmt.execute([key])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn list_keys_sync(&self) -> Result<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT key FROM kv ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(keys)
    }

    fn multi_get_sync(&self, keys: &[String]) -> Result<Vec<(String, Option<String>)>> {
        let conn = self.conn();
        let mut stmt = conn.prepare_cached("SELECT value FROM kv WHERE key = ?1")?;
        let mut out = Vec::with_capacity(keys.len());
        for key in keys {
            let value: Option<String> = stmt.query_row([key], |row| row.get(0)).optional()?;
            out.push((key.clone(), value));
        }
        Ok(out)
    }
}

impl KeyValueStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.get_sync(key)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_many_sync(&[(key.to_string(), value.to_string())])
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.remove_many_sync(&[key.to_string()])
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        self.list_keys_sync()
    }

    async fn multi_get(&self, keys: &[String]) -> Result<Vec<(String, Option<String>)>> {
        self.multi_get_sync(keys)
    }

    async fn multi_set(&self, pairs: &[(String, String)]) -> Result<()> {
        self.set_many_sync(pairs)
    }

    async fn multi_remove(&self, keys: &[String]) -> Result<()> {
        self.remove_many_sync(keys)
    }
}
