//! Concurrency-bounded scheduler for a batch of URLs
//!
//! This module handles:
//! - Spawning one expansion task per input URL
//! - Capping simultaneously in-flight requests with a semaphore
//! - Collecting results in input order
//! - Aborting outstanding tasks when the batch is abandoned

use crate::expander::expand::Expander;
use crate::output::ExpansionStats;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// How often progress is logged (in completed URLs)
const PROGRESS_INTERVAL: usize = 1000;

/// Fans the expander out over a whole batch
///
/// The semaphore is a counting admission gate around the network step
/// only: filter checks and cache hits never wait for a permit, and waiters
/// are admitted in no particular order.
pub struct Scheduler {
    expander: Arc<Expander>,
    gate: Arc<Semaphore>,
    max_concurrency: usize,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `expander` - The single-URL expander shared by every task
    /// * `max_concurrency` - Maximum number of simultaneously in-flight requests
    pub fn new(expander: Arc<Expander>, max_concurrency: usize) -> Self {
        Self {
            expander,
            gate: Arc::new(Semaphore::new(max_concurrency)),
            max_concurrency,
        }
    }

    /// Expands every URL and returns the results in input order
    ///
    /// `result[i]` is always the result for `urls[i]`. A task that panics
    /// leaves its slot holding the original URL. Dropping the returned
    /// future aborts every task that has not finished yet.
    pub async fn expand_all(&self, urls: &[String], stats: Arc<ExpansionStats>) -> Vec<String> {
        let mut results = urls.to_vec();
        let mut tasks = JoinSet::new();

        for (index, url) in urls.iter().enumerate() {
            let expander = Arc::clone(&self.expander);
            let gate = Arc::clone(&self.gate);
            let stats = Arc::clone(&stats);
            let url = url.clone();

            tasks.spawn(async move {
                let expanded = expander.expand_url(&url, &gate, &stats).await;
                (index, expanded)
            });
        }

        let total = urls.len();
        let mut completed = 0;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, expanded)) => results[index] = expanded,
                Err(e) => tracing::error!("Expansion task failed: {}", e),
            }

            completed += 1;
            if completed % PROGRESS_INTERVAL == 0 {
                tracing::info!(
                    "Progress: {}/{} urls, {} requests in flight",
                    completed,
                    total,
                    self.in_flight()
                );
            }
        }

        results
    }

    /// Number of requests currently holding a permit
    pub fn in_flight(&self) -> usize {
        self.max_concurrency
            .saturating_sub(self.gate.available_permits())
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }
}
