//! Caching DNS resolver for the shared HTTP client
//!
//! Resolved addresses are reused for a fixed time-to-live so a batch with
//! thousands of URLs on the same shortener host resolves that host once.

use reqwest::dns::{Addrs, Name, Resolve, Resolving};
use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Addresses resolved for one host name
#[derive(Debug, Clone)]
struct CachedLookup {
    addrs: Vec<SocketAddr>,
    resolved_at: Instant,
}

impl CachedLookup {
    fn is_stale(&self, ttl: Duration) -> bool {
        self.resolved_at.elapsed() >= ttl
    }
}

/// DNS resolver with a per-host time-to-live cache
///
/// Cloning is cheap and clones share the same cache. A TTL of zero disables
/// caching and every lookup goes to the system resolver.
#[derive(Debug, Clone)]
pub struct CachingResolver {
    ttl: Duration,
    entries: Arc<Mutex<HashMap<String, CachedLookup>>>,
}

impl CachingResolver {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Resolves `host`, serving from the cache while the entry is fresh
    pub async fn lookup(&self, host: &str) -> io::Result<Vec<SocketAddr>> {
        if let Some(addrs) = self.cached(host) {
            tracing::trace!("DNS cache hit for {}", host);
            return Ok(addrs);
        }

        let addrs: Vec<SocketAddr> = tokio::net::lookup_host((host, 0)).await?.collect();
        if addrs.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no addresses found for {}", host),
            ));
        }

        if !self.ttl.is_zero() {
            let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            entries.insert(
                host.to_string(),
                CachedLookup {
                    addrs: addrs.clone(),
                    resolved_at: Instant::now(),
                },
            );
        }

        Ok(addrs)
    }

    fn cached(&self, host: &str) -> Option<Vec<SocketAddr>> {
        if self.ttl.is_zero() {
            return None;
        }

        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(host) {
            Some(entry) if !entry.is_stale(self.ttl) => Some(entry.addrs.clone()),
            Some(_) => {
                entries.remove(host);
                None
            }
            None => None,
        }
    }

    /// Number of hosts currently cached
    pub fn cached_hosts(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Resolve for CachingResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let resolver = self.clone();
        Box::pin(async move {
            let addrs = resolver.lookup(name.as_str()).await;
            let resolved: Result<Addrs, BoxError> = match addrs {
                Ok(addrs) => Ok(Box::new(addrs.into_iter())),
                Err(e) => Err(Box::new(e)),
            };
            resolved
        })
    }
}
