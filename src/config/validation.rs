use crate::config::types::{CacheBackend, CacheConfig, Config, ExpanderConfig, FilterConfig};
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Upper bound on the concurrency cap; beyond this the run exhausts sockets
const MAX_CONCURRENCY_LIMIT: usize = 10_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_expander_config(&config.expander)?;
    validate_filter_config(&config.filter)?;
    validate_cache_config(&config.cache)?;
    Ok(())
}

/// Validates expander configuration
fn validate_expander_config(config: &ExpanderConfig) -> ConfigResult<()> {
    if config.max_concurrency < 1 || config.max_concurrency > MAX_CONCURRENCY_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY_LIMIT, config.max_concurrency
        )));
    }

    if !config.timeout_seconds.is_finite() || config.timeout_seconds <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "timeout_seconds must be a positive number, got {}",
            config.timeout_seconds
        )));
    }

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates filter configuration
fn validate_filter_config(config: &FilterConfig) -> ConfigResult<()> {
    if config.max_length == Some(0) {
        return Err(ConfigError::Validation(
            "max_length must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates cache configuration
fn validate_cache_config(config: &CacheConfig) -> ConfigResult<()> {
    match config.backend {
        CacheBackend::Redis => validate_redis_url(&config.redis_url),
        CacheBackend::Sqlite if config.sqlite_path.as_os_str().is_empty() => Err(
            ConfigError::Validation("sqlite_path cannot be empty".to_string()),
        ),
        _ => Ok(()),
    }
}

/// Checks that a Redis connection string is a `redis://` or `rediss://` URL
pub fn validate_redis_url(redis_url: &str) -> ConfigResult<()> {
    let url = Url::parse(redis_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid redis_url: {}", e)))?;

    if !matches!(url.scheme(), "redis" | "rediss") {
        return Err(ConfigError::InvalidUrl(format!(
            "redis_url must use the redis:// or rediss:// scheme, got '{}'",
            redis_url
        )));
    }

    Ok(())
}
