//! Cache capability trait and error types.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    Connection(String),

    #[error("Cache operation error: {0}")]
    Operation(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Key-value store mapping an original URL to the URL it expanded to.
///
/// Implementations are shared by every expansion task of a run and must
/// serialize concurrent access internally. Entries are authoritative once
/// written: there is no invalidation and no expiry.
///
/// # Implementations
///
/// - [`crate::cache::NullCache`] - caching disabled, always misses
/// - [`crate::cache::MemoryCache`] - in-process map for a single run
/// - [`crate::cache::SqliteCache`] - persistent file cache
/// - [`crate::cache::RedisCache`] - external Redis server
#[async_trait]
pub trait ExpansionCache: Send + Sync {
    /// Looks up the expanded URL previously stored for `url`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(expanded))` on a hit
    /// - `Ok(None)` on a miss
    async fn get(&self, url: &str) -> CacheResult<Option<String>>;

    /// Stores `expanded` as the expansion of `url`.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if the entry was stored, `Ok(false)` if this cache does
    /// not keep entries.
    async fn set(&self, url: &str, expanded: &str) -> CacheResult<bool>;

    /// Short human-readable backend name, used in logs.
    fn name(&self) -> &'static str;
}
