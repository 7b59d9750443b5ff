//! Authoritative session cache.
//!
//! The cache maps `prefix + account` to the one token currently trusted for
//! that account. Overwriting the entry (new login, renewal) or deleting it
//! (logout) immediately invalidates every other token for the account, no
//! matter how much lifetime those tokens have left.
//!
//! The gateway receives the cache as an injected `Arc<dyn SessionCache>`.
//! Production uses [`RedisSessionCache`]; tests substitute an in-memory map.

pub mod redis;

pub use self::redis::RedisSessionCache;

use async_trait::async_trait;
use thiserror::Error;

/// Infrastructure failure talking to the session cache.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Session cache unavailable: {0}")]
    Unavailable(String),
}

/// Key/value store holding the authoritative token per account.
#[async_trait]
pub trait SessionCache: Send + Sync {
    /// Fetch the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key`, replacing any previous value, expiring after `ttl_seconds`.
    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), CacheError>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}
