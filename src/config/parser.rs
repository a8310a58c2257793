use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigResult;
use sha2::{Digest, Sha256};
use std::path::Path;
use url::Url;

/// Loads and parses a configuration file from the given path
///
/// Every section and key is optional; anything missing keeps its default.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use unshorten::config::load_config;
///
/// let config = load_config(Path::new("unshorten.toml")).unwrap();
/// println!("Max concurrency: {}", config.expander.max_concurrency);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from a TOML string
pub fn parse_config(content: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so two runs can be told apart by their settings.
pub fn compute_config_hash(path: &Path) -> ConfigResult<String> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> ConfigResult<(Config, String)> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Builds a Redis connection string from the environment
///
/// `REDIS_URL` wins when set. Otherwise `REDIS_HOST`, `REDIS_PORT` and
/// `REDIS_PASSWORD` are combined; if none of them is set, `None` is returned
/// and the configured URL is kept.
pub fn redis_url_from_env() -> Option<String> {
    if let Ok(url) = std::env::var("REDIS_URL") {
        return Some(url);
    }

    let host = std::env::var("REDIS_HOST").ok();
    let port = std::env::var("REDIS_PORT").ok();
    let password = std::env::var("REDIS_PASSWORD").ok();

    redis_url_from_parts(host.as_deref(), port.as_deref(), password.as_deref())
}

fn redis_url_from_parts(
    host: Option<&str>,
    port: Option<&str>,
    password: Option<&str>,
) -> Option<String> {
    if host.is_none() && port.is_none() && password.is_none() {
        return None;
    }

    let host = host.filter(|h| !h.is_empty()).unwrap_or("127.0.0.1");
    let port = port.filter(|p| !p.is_empty()).unwrap_or("6379");

    let mut url = match Url::parse(&format!("redis://{}:{}", host, port)) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Ignoring REDIS_HOST/REDIS_PORT ({}:{}): {}", host, port, e);
            return None;
        }
    };

    // set_password percent-encodes reserved characters
    if let Some(password) = password.filter(|p| !p.is_empty()) {
        if url.set_password(Some(password)).is_err() {
            tracing::warn!("Ignoring REDIS_PASSWORD: cannot be set on {}", host);
            return None;
        }
    }

    Some(url.to_string())
}
