//! Key-value storage adapter trait.
//!
//! Defines the durable-storage boundary the record store talks to: string
//! keys, string values, single and batch operations. Every call is a
//! suspension point and may fail with a storage error. No atomicity is
//! promised across keys.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Trait for durable key-value stores.
///
/// Implemented by [`SqliteKvStore`](super::SqliteKvStore) and [`MemoryStore`].
pub trait KeyValueStore: Send + Sync {
    /// Read a single key.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Write a single key.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<()>> + Send;

    /// Remove a single key. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> impl Future<Output = Result<()>> + Send;

    /// List every key in the store.
    fn list_keys(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Read several keys. Output order matches `keys`.
    fn multi_get(
        &self,
        keys: &[String],
    ) -> impl Future<Output = Result<Vec<(String, Option<String>)>>> + Send;

    /// Write several keys.
    fn multi_set(&self, pairs: &[(String, String)]) -> impl Future<Output = Result<()>> + Send;

    /// Remove several keys.
    fn multi_remove(&self, keys: &[String]) -> impl Future<Output = Result<()>> + Send;
}

/// Call counters kept by [`MemoryStore`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct StoreStats {
    /// `get`, `list_keys` and `multi_get` calls.
    pub reads: usize,
    /// `set`, `delete`, `multi_set` and `multi_remove` calls.
    pub writes: usize,
    /// `multi_set` calls only.
    pub batch_writes: usize,
}

/// In-process key-value store.
///
/// Each call yields to the scheduler once before touching the map so that
/// interleavings at storage boundaries behave like a real async backend.
/// Reads and writes can be switched to fail for exercising degraded paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    batch_writes: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `entries`.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::default();
        store
            .entries()
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        store
    }

    /// Make every subsequent read fail (or succeed again).
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent write fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of the call counters.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            reads: self.reads.load(Ordering::SeqCst),
            writes: self.writes.load(Ordering::SeqCst),
            batch_writes: self.batch_writes.load(Ordering::SeqCst),
        }
    }

    /// Synchronous peek at a value, bypassing counters and failure switches.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    /// Synchronous list of keys, bypassing counters and failure switches.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.entries().keys().cloned().collect()
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn begin_read(&self, op: &'static str) -> Result<()> {
        tokio::task::yield_now().await;
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::storage(op, "simulated read failure"));
        }
        Ok(())
    }

    async fn begin_write(&self, op: &'static str) -> Result<()> {
        tokio::task::yield_now().await;
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::storage(op, "simulated write failure"));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.begin_read("get").await?;
        let value = self.entries().get(key).cloned();
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.begin_write("set").await?;
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.begin_write("delete").await?;
        self.entries().remove(key);
        Ok(())
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        self.begin_read("list_keys").await?;
        let keys = self.keys();
        Ok(keys)
    }

    async fn multi_get(&self, keys: &[String]) -> Result<Vec<(String, Option<String>)>> {
        self.begin_read("multi_get").await?;
        let values = {
            let entries = self.entries();
            keys.iter()
                .map(|k| (k.clone(), entries.get(k).cloned()))
                .collect()
        };
        Ok(values)
    }

    async fn multi_set(&self, pairs: &[(String, String)]) -> Result<()> {
        self.begin_write("multi_set").await?;
        self.batch_writes.fetch_add(1, Ordering::SeqCst);
        self.entries().extend(pairs.iter().cloned());
        Ok(())
    }

    async fn multi_remove(&self, keys: &[String]) -> Result<()> {
        self.begin_write("multi_remove").await?;
        {
            let mut entries = self.entries();
            for key in keys {
                entries.remove(key);
            }
        }
        Ok(())
    }
}
