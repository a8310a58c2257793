//! Redis-backed expansion cache.

use super::service::{CacheError, CacheResult, ExpansionCache};
use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use tracing::info;

/// Redis cache implementation.
///
/// Keys are the exact original URLs and values the expanded URLs, with no
/// expiry, so the store can be shared with other tools that read the same
/// keys. Uses `ConnectionManager` so every task shares one multiplexed
/// connection that reconnects on failure.
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Connection`] if the URL is invalid, the connection
    /// cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str) -> CacheResult<Self> {
        info!("Connecting to Redis at {}", redacted(redis_url));

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::Connection(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::Connection(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::Connection(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self { conn: manager })
    }
}

#[async_trait]
impl ExpansionCache for RedisCache {
    async fn get(&self, url: &str) -> CacheResult<Option<String>> {
        let mut conn = self.conn.clone();
        Ok(conn.get::<_, Option<String>>(url).await?)
    }

    async fn set(&self, url: &str, expanded: &str) -> CacheResult<bool> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(url, expanded).await?;
        Ok(true)
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

/// Hides the password of a `redis://:password@host` URL for logging
fn redacted(redis_url: &str) -> String {
    match url::Url::parse(redis_url) {
        Ok(mut parsed) if parsed.password().is_some() => {
            let _ = parsed.set_password(Some("***"));
            parsed.to_string()
        }
        _ => redis_url.to_string(),
    }
}
