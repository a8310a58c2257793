//! Unshorten: a concurrent URL expander
//!
//! This crate resolves large batches of shortened URLs to their final
//! destination by issuing HEAD requests and following redirects, while
//! bounding outbound concurrency, filtering which URLs are attempted, and
//! caching results across runs.

pub mod cache;
pub mod config;
pub mod expander;
pub mod input;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Unshorten operations
///
/// Per-URL network failures never surface here; they are absorbed by the
/// expander and reported through [`output::ExpansionStats`].
#[derive(Debug, Error)]
pub enum UnshortenError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cache error: {0}")]
    Cache(#[from] cache::CacheError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid domain list: {0}")]
    DomainList(#[from] regex::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Unshorten operations
pub type Result<T> = std::result::Result<T, UnshortenError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use cache::{ExpansionCache, MemoryCache, NullCache};
pub use config::Config;
pub use expander::{Coordinator, ExpandOutcome, Expander, RunReport, Scheduler};
pub use output::{ExpansionStats, StatsSnapshot};
pub use url::{DomainMatcher, EligibilityFilter};
