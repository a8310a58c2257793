//! Single-URL expansion
//!
//! Filter first, then cache, then network. Every failure is absorbed into an
//! [`ExpandOutcome`]; nothing here returns an error to the caller.

use crate::cache::ExpansionCache;
use crate::expander::fetcher::{fetch_url, FetchResult};
use crate::output::ExpansionStats;
use crate::url::{Eligibility, EligibilityFilter};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, trace, warn};

/// What happened to one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpandOutcome {
    /// Rejected by the eligibility filter; the URL is kept as-is
    Ignored(Eligibility),
    /// Served from the cache
    Cached(String),
    /// Resolved over the network (possibly to the same URL)
    Resolved(String),
    /// The request timed out; the URL is kept as-is
    Timeout,
    /// The request failed; the URL is kept as-is
    Failed(String),
}

impl ExpandOutcome {
    /// The result string for `original`
    pub fn into_url(self, original: &str) -> String {
        match self {
            Self::Cached(url) | Self::Resolved(url) => url,
            Self::Ignored(_) | Self::Timeout | Self::Failed(_) => original.to_string(),
        }
    }

    /// Returns true for timeouts and other request failures
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Timeout | Self::Failed(_))
    }
}

/// Expands single URLs using the run's shared client and cache
pub struct Expander {
    client: Client,
    filter: EligibilityFilter,
    cache: Arc<dyn ExpansionCache>,
    timeout: Duration,
}

impl Expander {
    /// Creates a new expander
    ///
    /// # Arguments
    ///
    /// * `client` - The shared HTTP client (one connection pool per run)
    /// * `filter` - Eligibility rules checked before anything else
    /// * `cache` - Cache consulted before and populated after each request
    /// * `timeout` - Per-request timeout, redirects included
    pub fn new(
        client: Client,
        filter: EligibilityFilter,
        cache: Arc<dyn ExpansionCache>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            filter,
            cache,
            timeout,
        }
    }

    /// Expands one URL
    ///
    /// # Flow
    ///
    /// 1. Ineligible URLs are counted `ignored` and never reach the cache
    /// 2. A cache hit is counted `cached_retrieved` and returned
    /// 3. Otherwise a HEAD request is sent while holding one `gate` permit;
    ///    a resolved URL that differs from the input is counted `expanded`
    ///    and written to the cache (`cached` when the cache kept it)
    /// 4. Failures are counted `error` (and `timeout` for timeouts)
    pub async fn expand(&self, url: &str, gate: &Semaphore, stats: &ExpansionStats) -> ExpandOutcome {
        let eligibility = self.filter.check(url);
        if !eligibility.is_eligible() {
            trace!("Ignoring {} ({:?})", url, eligibility);
            stats.record_ignored();
            return ExpandOutcome::Ignored(eligibility);
        }

        match self.cache.get(url).await {
            Ok(Some(expanded)) => {
                trace!("Cache HIT: {} -> {}", url, expanded);
                stats.record_cache_hit();
                return ExpandOutcome::Cached(expanded);
            }
            Ok(None) => trace!("Cache MISS: {}", url),
            Err(e) => warn!("Cache lookup failed for {}: {}", url, e),
        }

        let fetched = {
            let _permit = match gate.acquire().await {
                Ok(permit) => permit,
                Err(_) => {
                    stats.record_error(false);
                    return ExpandOutcome::Failed("admission gate closed".to_string());
                }
            };
            fetch_url(&self.client, url, self.timeout).await
        };

        match fetched {
            FetchResult::Resolved {
                final_url,
                redirected,
                status_code,
            } => {
                trace!("Resolved {} -> {} (HTTP {})", url, final_url, status_code);
                if !redirected {
                    return ExpandOutcome::Resolved(url.to_string());
                }

                stats.record_expanded();
                match self.cache.set(url, &final_url).await {
                    Ok(true) => stats.record_cached(),
                    Ok(false) => {}
                    Err(e) => warn!("Cache write failed for {}: {}", url, e),
                }
                ExpandOutcome::Resolved(final_url)
            }
            FetchResult::Timeout => {
                debug!("TimeoutError: no response within {:?}: {}", self.timeout, url);
                stats.record_error(true);
                ExpandOutcome::Timeout
            }
            FetchResult::Failed { error } => {
                debug!("{}: {}", error, url);
                stats.record_error(false);
                ExpandOutcome::Failed(error)
            }
        }
    }

    /// Expands one URL and returns the result string
    pub async fn expand_url(&self, url: &str, gate: &Semaphore, stats: &ExpansionStats) -> String {
        self.expand(url, gate, stats).await.into_url(url)
    }
}
