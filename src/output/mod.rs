//! Output module for expansion results and run reports
//!
//! This module handles:
//! - Writing expanded URLs back to disk
//! - Counting per-URL outcomes while a run is in progress
//! - Logging the final statistics report

pub mod stats;
mod writer;

pub use stats::{log_statistics, log_throughput, throughput, ExpansionStats, StatsSnapshot};
pub use writer::write_results;
