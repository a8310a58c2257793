//! No-op cache used when caching is disabled.

use super::service::{CacheResult, ExpansionCache};
use async_trait::async_trait;
use tracing::debug;

/// A cache implementation that stores nothing.
///
/// Behaves exactly like a cache that always misses, so the expander needs
/// no special case for "caching disabled".
#[derive(Debug)]
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExpansionCache for NullCache {
    async fn get(&self, _url: &str) -> CacheResult<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _url: &str, _expanded: &str) -> CacheResult<bool> {
        Ok(false)
    }

    fn name(&self) -> &'static str {
        "none"
    }
}
