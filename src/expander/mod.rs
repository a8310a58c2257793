//! Expander module for resolving shortened URLs
//!
//! This module contains the core expansion logic, including:
//! - The shared HTTP client with a caching DNS resolver
//! - Single-URL expansion (filter, cache, network)
//! - Concurrency-bounded scheduling of a whole batch
//! - Run coordination, timing and reporting

mod coordinator;
mod dns;
mod expand;
mod fetcher;
mod scheduler;

pub use coordinator::{run_expansion, Coordinator, RunReport};
pub use dns::CachingResolver;
pub use expand::{ExpandOutcome, Expander};
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use scheduler::Scheduler;
