//! Configuration module for Unshorten
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every key has a default, so running without a file is supported.
//!
//! # Example
//!
//! ```no_run
//! use unshorten::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("unshorten.toml")).unwrap();
//! println!("Requests time out after {}s", config.expander.timeout_seconds);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CacheBackend, CacheConfig, Config, ExpanderConfig, FilterConfig, DEFAULT_DNS_CACHE_TTL,
    DEFAULT_MAX_CONCURRENCY, DEFAULT_MAX_REDIRECTS, DEFAULT_REDIS_URL, DEFAULT_TIMEOUT_SECONDS,
};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, parse_config, redis_url_from_env,
};
pub use validation::{validate, validate_redis_url};
