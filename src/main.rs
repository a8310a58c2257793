//! Unshorten main entry point
//!
//! This is the command-line interface for the Unshorten URL expander.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use unshorten::config::{
    load_config_with_hash, redis_url_from_env, validate, CacheBackend, Config,
};
use unshorten::expander::Coordinator;
use unshorten::input::{read_domains, read_urls};
use unshorten::output::write_results;

/// Unshorten: expand URLs from shortening services
///
/// Reads one URL per line from INPUT, resolves each one by following its
/// redirects, and writes the final URLs to OUTPUT in the same order. URLs
/// that are filtered out or fail to resolve are written unchanged.
#[derive(Parser, Debug)]
#[command(name = "unshorten")]
#[command(version)]
#[command(about = "Expand URLs from shortening services", long_about = None)]
struct Cli {
    /// File with one URL per line
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// File to write the expanded URLs to
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Ignore URLs longer than LEN characters
    #[arg(short = 'm', long = "maxlen", value_name = "LEN")]
    max_length: Option<usize>,

    /// Expand only URLs whose domain is listed in the CSV file at PATH
    #[arg(short = 'd', long = "domains", value_name = "PATH")]
    domains_path: Option<PathBuf>,

    /// The domains file has no header line
    #[arg(long)]
    domains_noheader: bool,

    /// Disable the expansion cache
    #[arg(long)]
    no_cache: bool,

    /// Cache store: none, memory, sqlite or redis
    #[arg(long, value_name = "KIND", conflicts_with = "no_cache")]
    cache_backend: Option<CacheBackend>,

    /// Redis connection string (overrides REDIS_* environment variables)
    #[arg(long, value_name = "URL")]
    redis_url: Option<String>,

    /// SQLite cache file
    #[arg(long, value_name = "PATH")]
    sqlite_path: Option<PathBuf>,

    /// Maximum number of simultaneous requests
    #[arg(short = 'c', long, value_name = "N")]
    concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(short = 't', long, value_name = "SECS")]
    timeout: Option<f64>,

    /// How long resolved host addresses are reused, in seconds
    #[arg(long, value_name = "SECS")]
    dns_ttl: Option<u64>,

    /// Path to a TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging (same as -v)
    #[arg(long)]
    debug: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with_all = ["verbose", "debug"])]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose.saturating_add(u8::from(cli.debug)), cli.quiet);
    dotenvy::dotenv().ok();

    let config = load_settings(&cli)?;

    let domains = match &config.filter.domains_path {
        Some(path) => {
            let domains = read_domains(path, config.filter.domains_header)
                .with_context(|| format!("Failed to read domains from {}", path.display()))?;
            tracing::info!("Loaded {} domains from {}", domains.len(), path.display());
            Some(domains)
        }
        None => None,
    };

    let urls = read_urls(&cli.input)
        .with_context(|| format!("Failed to read URLs from {}", cli.input.display()))?;

    let coordinator = Coordinator::new(&config, domains.as_deref())
        .await
        .context("Failed to set up the expander")?;

    let report = coordinator.run_until(&urls, shutdown_signal()).await;

    let written = match &report.results {
        Some(results) => write_results(&cli.output, results)
            .with_context(|| format!("Failed to write results to {}", cli.output.display())),
        None => Ok(()),
    };

    report.log();
    written
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("unshorten=info,warn"),
            1 => EnvFilter::new("unshorten=debug,info"),
            2 => EnvFilter::new("unshorten=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Builds the effective configuration: defaults, file, environment, flags
fn load_settings(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(redis_url) = redis_url_from_env() {
        config.cache.redis_url = redis_url;
    }

    apply_cli_overrides(&mut config, cli);
    validate(&config).context("Invalid configuration")?;

    tracing::debug!("Effective configuration: {:?}", config);
    Ok(config)
}

fn apply_cli_overrides(config: &mut Config, cli: &Cli) {
    if let Some(max_length) = cli.max_length {
        config.filter.max_length = Some(max_length);
    }
    if let Some(path) = &cli.domains_path {
        config.filter.domains_path = Some(path.clone());
    }
    if cli.domains_noheader {
        config.filter.domains_header = false;
    }

    if let Some(backend) = cli.cache_backend {
        config.cache.backend = backend;
    }
    if cli.no_cache {
        config.cache.backend = CacheBackend::None;
    }
    if let Some(redis_url) = &cli.redis_url {
        config.cache.redis_url = redis_url.clone();
    }
    if let Some(path) = &cli.sqlite_path {
        config.cache.sqlite_path = path.clone();
    }

    if let Some(concurrency) = cli.concurrency {
        config.expander.max_concurrency = concurrency;
    }
    if let Some(timeout) = cli.timeout {
        config.expander.timeout_seconds = timeout;
    }
    if let Some(dns_ttl) = cli.dns_ttl {
        config.expander.dns_cache_ttl = dns_ttl;
    }
}

/// Completes when the user presses Ctrl+C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    eprintln!();
}
