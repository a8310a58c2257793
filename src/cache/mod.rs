//! Cache-aside layer for expanded URLs.
//!
//! Provides an [`ExpansionCache`] trait with four implementations:
//! - [`NullCache`] - no-op, used when caching is disabled
//! - [`MemoryCache`] - in-process map
//! - [`SqliteCache`] - persistent SQLite file
//! - [`RedisCache`] - external Redis server

mod memory_cache;
mod null_cache;
mod redis_cache;
mod service;
mod sqlite_cache;

pub use memory_cache::MemoryCache;
pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, ExpansionCache};
pub use sqlite_cache::SqliteCache;

use crate::config::{CacheBackend, CacheConfig};
use std::sync::Arc;

/// Opens the cache selected by the configuration
///
/// # Errors
///
/// Fails if the SQLite file cannot be opened or Redis is unreachable.
pub async fn open_cache(config: &CacheConfig) -> CacheResult<Arc<dyn ExpansionCache>> {
    let cache: Arc<dyn ExpansionCache> = match config.backend {
        CacheBackend::None => Arc::new(NullCache::new()),
        CacheBackend::Memory => Arc::new(MemoryCache::new()),
        CacheBackend::Sqlite => Arc::new(SqliteCache::open(&config.sqlite_path)?),
        CacheBackend::Redis => Arc::new(RedisCache::connect(&config.redis_url).await?),
    };

    tracing::info!("Using {} expansion cache", cache.name());
    Ok(cache)
}
