//! HTTP fetcher implementation
//!
//! This module handles all network I/O for the expander:
//! - Building the run-wide HTTP client (connection pool, DNS cache, TLS)
//! - Issuing one HEAD request per URL with redirects followed
//! - Classifying transport failures

use crate::config::ExpanderConfig;
use crate::expander::dns::CachingResolver;
use reqwest::{redirect::Policy, Client};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Result of a single resolve request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// The request completed; any HTTP status counts
    Resolved {
        /// Final URL after following redirects
        final_url: String,
        /// Whether the final URL differs from the requested one
        redirected: bool,
        /// HTTP status code of the last response
        status_code: u16,
    },

    /// No response within the request timeout
    Timeout,

    /// Connection, protocol, redirect or URL encoding failure
    Failed {
        /// Error description, prefixed with its kind
        error: String,
    },
}

/// Builds the HTTP client shared by every request of a run
///
/// The client follows up to `max_redirects` redirects, does not verify TLS
/// certificates, keeps idle connections per host for reuse, and resolves
/// host names through a [`CachingResolver`] with the configured TTL.
///
/// # Example
///
/// ```
/// use unshorten::config::ExpanderConfig;
/// use unshorten::expander::build_http_client;
///
/// let client = build_http_client(&ExpanderConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &ExpanderConfig) -> Result<Client, reqwest::Error> {
    let resolver = Arc::new(CachingResolver::new(config.dns_cache_ttl()));

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout())
        .redirect(Policy::limited(config.max_redirects))
        .danger_accept_invalid_certs(true)
        .pool_max_idle_per_host(config.max_concurrency)
        .dns_resolver(resolver)
        .build()
}

/// Resolves a URL to its final destination with one HEAD request
///
/// # Request Flow
///
/// 1. Parse the URL; unparseable text fails without touching the network
/// 2. Send HEAD with redirects followed and `timeout` covering the whole chain
/// 3. Report the URL of the last response, whatever its status
///
/// `redirected` compares parsed URLs, so normalization alone (a trailing
/// `/` on an empty path, a default port) never counts as a redirect.
///
/// | Condition                      | Result      |
/// |--------------------------------|-------------|
/// | Any HTTP response              | Resolved    |
/// | Timeout                        | Timeout     |
/// | Connection refused / DNS error | Failed      |
/// | Redirect chain too long        | Failed      |
/// | Malformed URL                  | Failed      |
///
/// No retry is attempted.
pub async fn fetch_url(client: &Client, url: &str, timeout: Duration) -> FetchResult {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            return FetchResult::Failed {
                error: format!("InvalidUrl: {}", e),
            }
        }
    };

    match client.head(parsed.clone()).timeout(timeout).send().await {
        Ok(response) => FetchResult::Resolved {
            final_url: response.url().to_string(),
            redirected: response.url() != &parsed,
            status_code: response.status().as_u16(),
        },
        Err(e) => classify_error(&e),
    }
}

/// Maps a reqwest error onto a fetch result
fn classify_error(e: &reqwest::Error) -> FetchResult {
    if e.is_timeout() {
        return FetchResult::Timeout;
    }

    let kind = if e.is_connect() {
        "ConnectError"
    } else if e.is_redirect() {
        "RedirectError"
    } else if e.is_builder() {
        "InvalidUrl"
    } else if e.is_request() {
        "RequestError"
    } else {
        "ClientError"
    };

    FetchResult::Failed {
        error: format!("{}: {}", kind, e),
    }
}
