//! In-process cache backed by a hash map.

use super::service::{CacheResult, ExpansionCache};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory expansion cache.
///
/// Entries live as long as the cache value itself; share one instance
/// (behind an `Arc`) between runs to reuse expansions without a server.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache pre-populated with `(original, expanded)` pairs.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Number of cached expansions.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ExpansionCache for MemoryCache {
    async fn get(&self, url: &str) -> CacheResult<Option<String>> {
        // A poisoned lock still holds valid entries: each writer inserts one key.
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(url).cloned())
    }

    async fn set(&self, url: &str, expanded: &str) -> CacheResult<bool> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(url.to_string(), expanded.to_string());
        Ok(true)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
