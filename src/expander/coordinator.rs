//! Run coordinator - batch orchestration
//!
//! This module wires one run together:
//! - Building the shared HTTP client, eligibility filter and cache
//! - Handing the batch to the scheduler
//! - Racing the batch against an interrupt
//! - Timing the run and reporting statistics

use crate::cache::{open_cache, ExpansionCache};
use crate::config::{Config, ExpanderConfig};
use crate::expander::expand::Expander;
use crate::expander::fetcher::build_http_client;
use crate::expander::scheduler::Scheduler;
use crate::output::{log_statistics, log_throughput, throughput, ExpansionStats, StatsSnapshot};
use crate::url::EligibilityFilter;
use crate::Result;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Outcome of one batch run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Results in input order; `None` if the run was interrupted
    pub results: Option<Vec<String>>,

    /// Counter values at the end of the run
    pub stats: StatsSnapshot,

    /// Number of input URLs
    pub total: usize,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Wall-clock duration of the run
    pub elapsed: Duration,

    /// Whether the run was stopped before every URL finished
    pub interrupted: bool,
}

impl RunReport {
    /// URLs per second over the whole run
    pub fn throughput(&self) -> f64 {
        throughput(self.total, self.elapsed)
    }

    /// Logs the final report: throughput (completed runs only) and counters
    pub fn log(&self) {
        if self.interrupted {
            tracing::info!("Interrupted by user.");
        } else {
            log_throughput(self.total, self.elapsed);
        }
        log_statistics(&self.stats);
    }
}

/// Main run coordinator structure
///
/// Owns one HTTP client (and so one connection pool and DNS cache) for all
/// of its runs.
pub struct Coordinator {
    scheduler: Scheduler,
}

impl Coordinator {
    /// Creates a coordinator from the full configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The run configuration
    /// * `domains` - Already-loaded domain allow-list, if any
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Client built and cache opened
    /// * `Err(UnshortenError)` - Bad domain list, client or cache failure
    pub async fn new(config: &Config, domains: Option<&[String]>) -> Result<Self> {
        let filter = EligibilityFilter::from_settings(config.filter.max_length, domains)?;
        let cache = open_cache(&config.cache).await?;
        Self::with_cache(&config.expander, filter, cache)
    }

    /// Creates a coordinator around an existing cache
    pub fn with_cache(
        config: &ExpanderConfig,
        filter: EligibilityFilter,
        cache: Arc<dyn ExpansionCache>,
    ) -> Result<Self> {
        let client = build_http_client(config)?;
        let expander = Expander::new(client, filter, cache, config.timeout());
        let scheduler = Scheduler::new(Arc::new(expander), config.max_concurrency);

        Ok(Self { scheduler })
    }

    /// Expands a batch to completion
    pub async fn run(&self, urls: &[String]) -> RunReport {
        self.run_until(urls, std::future::pending::<()>()).await
    }

    /// Expands a batch, stopping early if `shutdown` completes first
    ///
    /// Statistics start from zero for every run. On shutdown, outstanding
    /// tasks are aborted, no results are returned, and the counters gathered
    /// so far are still reported.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use unshorten::config::Config;
    /// use unshorten::expander::Coordinator;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let coordinator = Coordinator::new(&Config::default(), None).await?;
    /// let urls = vec!["https://bit.ly/3xyz".to_string()];
    /// let report = coordinator
    ///     .run_until(&urls, async {
    ///         let _ = tokio::signal::ctrl_c().await;
    ///     })
    ///     .await;
    /// report.log();
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run_until<F>(&self, urls: &[String], shutdown: F) -> RunReport
    where
        F: Future<Output = ()>,
    {
        let stats = Arc::new(ExpansionStats::new());
        let started_at = Utc::now();
        let start = Instant::now();

        tracing::info!(
            "Expanding {} urls (max {} in flight), started at {}",
            urls.len(),
            self.scheduler.max_concurrency(),
            started_at.to_rfc3339()
        );

        let results = tokio::select! {
            results = self.scheduler.expand_all(urls, Arc::clone(&stats)) => Some(results),
            _ = shutdown => {
                tracing::warn!("Shutdown requested, abandoning outstanding requests");
                None
            }
        };

        RunReport {
            interrupted: results.is_none(),
            results,
            stats: stats.snapshot(),
            total: urls.len(),
            started_at,
            elapsed: start.elapsed(),
        }
    }
}

/// Expands a batch with a fresh coordinator
///
/// This is the main entry point for library use: it builds the filter,
/// cache and client from `config`, runs the batch to completion and
/// returns the report.
pub async fn run_expansion(
    config: &Config,
    urls: &[String],
    domains: Option<&[String]>,
) -> Result<RunReport> {
    let coordinator = Coordinator::new(config, domains).await?;
    Ok(coordinator.run(urls).await)
}
