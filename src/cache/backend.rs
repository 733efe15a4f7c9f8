//! Cache Backend Contract
//!
//! The key-value capability the catalog coordinator caches through, and the
//! in-process implementation built on [`CacheStore`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{CacheStats, CacheStore};
use crate::error::CacheResult;

/// Key-value store with expiry and pattern deletion.
///
/// Every call may fail with a [`crate::error::CacheError`]; callers treat any
/// failure as "cache absent".
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Fetch the bytes stored under `key`, `None` when absent or expired.
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Store `value` under `key`, expiring after `ttl`.
    async fn set_with_expiry(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Remove every key matching the glob `pattern`; returns the count removed.
    async fn delete_by_pattern(&self, pattern: &str) -> CacheResult<usize>;

    /// Liveness probe.
    async fn ping(&self) -> CacheResult<bool>;

    /// Short backend name for logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Engine counters, when the backend keeps them.
    async fn engine_stats(&self) -> Option<CacheStats> {
        None
    }
}

// == Memory Cache Backend ==
/// In-process backend sharing one [`CacheStore`] behind a tokio `RwLock`.
#[derive(Clone)]
pub struct MemoryCacheBackend {
    store: Arc<RwLock<CacheStore>>,
}

impl MemoryCacheBackend {
    pub fn new(max_entries: usize) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::new(max_entries))),
        }
    }

    /// Shared handle to the underlying engine (used by the sweep task and tests).
    pub fn store(&self) -> Arc<RwLock<CacheStore>> {
        self.store.clone()
    }

    /// Live keys currently held, sorted.
    pub async fn keys(&self) -> Vec<String> {
        self.store.read().await.keys()
    }

    /// True if `key` currently holds a live entry.
    pub async fn contains_key(&self, key: &str) -> bool {
        self.store.read().await.contains_key(key)
    }
}

#[async_trait]
impl CacheBackend for MemoryCacheBackend {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        // Write lock: a read refreshes LRU order and may drop an expired entry
        let mut store = self.store.write().await;
        Ok(store.get(key))
    }

    async fn set_with_expiry(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()> {
        let mut store = self.store.write().await;
        store.set(key, value.to_vec(), ttl)
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut store = self.store.write().await;
        store.delete(key);
        Ok(())
    }

    async fn delete_by_pattern(&self, pattern: &str) -> CacheResult<usize> {
        let mut store = self.store.write().await;
        Ok(store.delete_matching(pattern))
    }

    async fn ping(&self) -> CacheResult<bool> {
        Ok(true)
    }

    fn name(&self) -> &'static str {
        "memory"
    }

    async fn engine_stats(&self) -> Option<CacheStats> {
        Some(self.store.read().await.stats())
    }
}
