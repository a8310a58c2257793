//! Expansion statistics
//!
//! Counters shared by every expansion task of a run, plus the final report
//! emitted once the run ends.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Live counters updated concurrently by expansion tasks
///
/// Increments are atomic, so tasks running on different worker threads
/// never lose updates. Values are for reporting only.
#[derive(Debug, Default)]
pub struct ExpansionStats {
    ignored: AtomicU64,
    timeout: AtomicU64,
    error: AtomicU64,
    cached: AtomicU64,
    cached_retrieved: AtomicU64,
    expanded: AtomicU64,
}

impl ExpansionStats {
    /// Creates a counter set with every counter at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// URL skipped by the eligibility filter
    pub fn record_ignored(&self) {
        self.ignored.fetch_add(1, Ordering::Relaxed);
    }

    /// Request failed; `timed_out` additionally bumps the timeout counter
    pub fn record_error(&self, timed_out: bool) {
        self.error.fetch_add(1, Ordering::Relaxed);
        if timed_out {
            self.timeout.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// A new expansion was written to the cache
    pub fn record_cached(&self) {
        self.cached.fetch_add(1, Ordering::Relaxed);
    }

    /// An expansion was served from the cache
    pub fn record_cache_hit(&self) {
        self.cached_retrieved.fetch_add(1, Ordering::Relaxed);
    }

    /// A request resolved to a URL different from the input
    pub fn record_expanded(&self) {
        self.expanded.fetch_add(1, Ordering::Relaxed);
    }

    /// Copies the current counter values
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            ignored: self.ignored.load(Ordering::Relaxed),
            timeout: self.timeout.load(Ordering::Relaxed),
            error: self.error.load(Ordering::Relaxed),
            cached: self.cached.load(Ordering::Relaxed),
            cached_retrieved: self.cached_retrieved.load(Ordering::Relaxed),
            expanded: self.expanded.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`ExpansionStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// URLs rejected by the eligibility filter
    pub ignored: u64,
    /// Requests that timed out (also counted in `error`)
    pub timeout: u64,
    /// Requests that failed for any reason
    pub error: u64,
    /// Expansions written to the cache
    pub cached: u64,
    /// Expansions served from the cache
    pub cached_retrieved: u64,
    /// Requests that resolved to a different URL
    pub expanded: u64,
}

/// URLs processed per second, 0 when no time has elapsed
pub fn throughput(processed: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        processed as f64 / secs
    } else {
        0.0
    }
}

/// Logs the throughput line of the run report
pub fn log_throughput(processed: usize, elapsed: Duration) {
    tracing::info!(
        "Processed {} urls in {:.2}s ({:.2} urls/s)",
        processed,
        elapsed.as_secs_f64(),
        throughput(processed, elapsed)
    );
}

/// Logs the six counters of the run report
pub fn log_statistics(stats: &StatsSnapshot) {
    tracing::info!("Ignored: {}", stats.ignored);
    tracing::info!("Expanded: {}", stats.expanded);
    tracing::info!("Cached: {} ({} hits)", stats.cached, stats.cached_retrieved);
    tracing::info!("Errors: {} ({} timed out)", stats.error, stats.timeout);
}
