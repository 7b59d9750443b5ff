//! In-memory session cache mocks.
//!
//! [`InMemorySessionCache`] behaves like a single-node Redis holding plain
//! string values, and records every write so tests can assert that a
//! rejected request left the cache untouched. [`FailingSessionCache`]
//! simulates an unreachable cache.

use async_trait::async_trait;
use session_gateway::cache::{CacheError, SessionCache};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A stored cache value and the TTL it was written with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub value: String,
    pub ttl_seconds: u64,
}

/// Mock session cache backed by a `HashMap`.
///
/// Clones share state. TTLs are recorded but never enforced.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionCache {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, CacheEntry>,
    writes: usize,
    reads: usize,
}

impl InMemorySessionCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value stored under `key`.
    pub fn value(&self, key: &str) -> Option<String> {
        self.entry(key).map(|e| e.value)
    }

    /// Current entry stored under `key`, including its TTL.
    pub fn entry(&self, key: &str) -> Option<CacheEntry> {
        self.inner.lock().unwrap().entries.get(key).cloned()
    }

    /// Put a value directly, bypassing the write counter.
    pub fn insert(&self, key: &str, value: &str, ttl_seconds: u64) {
        self.inner.lock().unwrap().entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                ttl_seconds,
            },
        );
    }

    /// Drop a key directly, bypassing the write counter.
    pub fn remove(&self, key: &str) {
        self.inner.lock().unwrap().entries.remove(key);
    }

    /// Number of `set` and `delete` calls made through [`SessionCache`].
    pub fn write_count(&self) -> usize {
        self.inner.lock().unwrap().writes
    }

    /// Number of `get` calls made through [`SessionCache`].
    pub fn read_count(&self) -> usize {
        self.inner.lock().unwrap().reads
    }

    /// Snapshot of every stored key and value.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.inner
            .lock()
            .unwrap()
            .entries
            .iter()
            .map(|(k, e)| (k.clone(), e.value.clone()))
            .collect()
    }
}

#[async_trait]
impl SessionCache for InMemorySessionCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut inner = self.inner.lock().unwrap();
        inner.reads += 1;
        Ok(inner.entries.get(key).map(|e| e.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), CacheError> {
        let mut inner = self.inner.lock().unwrap();
        inner.writes += 1;
        inner.entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                ttl_seconds,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut inner = self.inner.lock().unwrap();
        inner.writes += 1;
        inner.entries.remove(key);
        Ok(())
    }
}

/// Session cache whose every operation fails with `Unavailable`.
#[derive(Debug, Clone)]
pub struct FailingSessionCache {
    reason: String,
}

impl Default for FailingSessionCache {
    fn default() -> Self {
        Self::new("connection refused")
    }
}

impl FailingSessionCache {
    /// Create a cache that fails with `reason`.
    #[must_use]
    pub fn new(reason: &str) -> Self {
        Self {
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl SessionCache for FailingSessionCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Unavailable(self.reason.clone()))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl_seconds: u64) -> Result<(), CacheError> {
        Err(CacheError::Unavailable(self.reason.clone()))
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Err(CacheError::Unavailable(self.reason.clone()))
    }
}
