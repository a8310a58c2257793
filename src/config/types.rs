use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default cap on simultaneously in-flight requests
pub const DEFAULT_MAX_CONCURRENCY: usize = 50;

/// Default per-request timeout (seconds)
pub const DEFAULT_TIMEOUT_SECONDS: f64 = 100.0;

/// Default lifetime of cached DNS answers (seconds)
pub const DEFAULT_DNS_CACHE_TTL: u64 = 300;

/// Default number of redirect hops before giving up
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Default Redis endpoint
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Main configuration structure for Unshorten
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub expander: ExpanderConfig,
    pub filter: FilterConfig,
    pub cache: CacheConfig,
}

/// Network behaviour of the expander
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExpanderConfig {
    /// Maximum number of simultaneously in-flight requests
    #[serde(rename = "max-concurrency")]
    pub max_concurrency: usize,

    /// Timeout applied to each request, redirects included (seconds)
    #[serde(rename = "timeout-seconds")]
    pub timeout_seconds: f64,

    /// How long resolved host addresses are reused (seconds, 0 disables)
    #[serde(rename = "dns-cache-ttl")]
    pub dns_cache_ttl: u64,

    /// Redirect hops followed before the request is treated as failed
    #[serde(rename = "max-redirects")]
    pub max_redirects: usize,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl ExpanderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_seconds)
    }

    pub fn dns_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.dns_cache_ttl)
    }
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            dns_cache_ttl: DEFAULT_DNS_CACHE_TTL,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: format!("unshorten/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Eligibility rules applied before any cache or network access
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// URLs longer than this many characters are never expanded
    #[serde(rename = "max-length")]
    pub max_length: Option<usize>,

    /// File listing the domains that may be expanded
    #[serde(rename = "domains-path")]
    pub domains_path: Option<PathBuf>,

    /// Whether the first record of the domain file is a header
    #[serde(rename = "domains-header")]
    pub domains_header: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            max_length: None,
            domains_path: None,
            domains_header: true,
        }
    }
}

/// Which store backs the expansion cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Caching disabled
    None,
    /// In-process map, lives for one run
    Memory,
    /// SQLite file, survives across runs
    Sqlite,
    /// External Redis server
    Redis,
}

impl std::str::FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            "redis" => Ok(Self::Redis),
            other => Err(format!(
                "unknown cache backend '{}' (expected none, memory, sqlite or redis)",
                other
            )),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,

    /// Connection string for the Redis backend
    #[serde(rename = "redis-url")]
    pub redis_url: String,

    /// Database file for the SQLite backend
    #[serde(rename = "sqlite-path")]
    pub sqlite_path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Redis,
            redis_url: DEFAULT_REDIS_URL.to_string(),
            sqlite_path: PathBuf::from("unshorten-cache.db"),
        }
    }
}
