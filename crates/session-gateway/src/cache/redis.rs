//! Redis-backed session cache.
//!
//! # Key Pattern
//!
//! - `{prefix}{account}` - Current authoritative token (string, with `EX` ttl)
//!
//! # Connection Pattern
//!
//! The redis-rs `MultiplexedConnection` is cheap to clone and safe to use
//! concurrently, so every operation clones it instead of taking a lock.

use crate::cache::{CacheError, SessionCache};
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use tracing::{error, instrument, warn};

/// Session cache stored in Redis.
#[derive(Clone)]
pub struct RedisSessionCache {
    connection: MultiplexedConnection,
}

impl RedisSessionCache {
    /// Connect to Redis.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Unavailable` if the URL is invalid or the connection fails.
    pub async fn connect(redis_url: &str) -> Result<Self, CacheError> {
        let client = Client::open(redis_url).map_err(|e| {
            // Do NOT log redis_url, it may carry credentials
            error!(target: "session.cache", error = %e, "Failed to open Redis client");
            CacheError::Unavailable(format!("Failed to open Redis client: {e}"))
        })?;

        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| {
                error!(target: "session.cache", error = %e, "Failed to connect to Redis");
                CacheError::Unavailable(format!("Failed to connect to Redis: {e}"))
            })?;

        Ok(Self { connection })
    }
}

#[async_trait]
impl SessionCache for RedisSessionCache {
    #[instrument(skip_all)]
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection.clone();
        conn.get(key).await.map_err(|e| {
            warn!(target: "session.cache", error = %e, "Failed to read session entry");
            CacheError::Unavailable(format!("GET failed: {e}"))
        })
    }

    #[instrument(skip_all, fields(ttl_seconds = ttl_seconds))]
    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), CacheError> {
        let mut conn = self.connection.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_seconds)
            .await
            .map_err(|e| {
                warn!(target: "session.cache", error = %e, "Failed to write session entry");
                CacheError::Unavailable(format!("SET failed: {e}"))
            })
    }

    #[instrument(skip_all)]
    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.connection.clone();
        conn.del::<_, ()>(key).await.map_err(|e| {
            warn!(target: "session.cache", error = %e, "Failed to delete session entry");
            CacheError::Unavailable(format!("DEL failed: {e}"))
        })
    }
}
