//! Integration tests for the expander
//!
//! These tests use wiremock to serve redirects, plain responses and slow
//! responses, and drive whole batches through the coordinator.

use std::sync::Arc;
use std::time::{Duration, Instant};
use unshorten::cache::{ExpansionCache, MemoryCache, SqliteCache};
use unshorten::config::ExpanderConfig;
use unshorten::expander::Coordinator;
use unshorten::url::EligibilityFilter;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn expander_config(max_concurrency: usize, timeout_seconds: f64) -> ExpanderConfig {
    ExpanderConfig {
        max_concurrency,
        timeout_seconds,
        ..ExpanderConfig::default()
    }
}

fn coordinator(
    config: &ExpanderConfig,
    filter: EligibilityFilter,
    cache: Arc<MemoryCache>,
) -> Coordinator {
    Coordinator::with_cache(config, filter, cache).expect("Failed to create coordinator")
}

/// Mounts `from` -> 301 -> `to`, and a 200 at `to`
async fn mount_redirect(server: &MockServer, from: &str, to: &str) {
    let location = format!("{}{}", server.uri(), to);
    Mock::given(method("HEAD"))
        .and(path(from))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", location.as_str()))
        .mount(server)
        .await;

    Mock::given(method("HEAD"))
        .and(path(to))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_redirect_is_expanded_and_cached() {
    let server = MockServer::start().await;
    mount_redirect(&server, "/abc", "/article").await;

    let cache = Arc::new(MemoryCache::new());
    let coordinator = coordinator(
        &expander_config(4, 5.0),
        EligibilityFilter::allow_all(),
        Arc::clone(&cache),
    );

    let short = format!("{}/abc", server.uri());
    let report = coordinator.run(&[short.clone()]).await;

    let expected = format!("{}/article", server.uri());
    assert_eq!(report.results, Some(vec![expected.clone()]));
    assert_eq!(report.stats.expanded, 1);
    assert_eq!(report.stats.cached, 1);
    assert_eq!(report.stats.error, 0);
    assert_eq!(cache.get(&short).await.unwrap(), Some(expected));
}

#[tokio::test]
async fn test_no_redirect_passes_through() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/plain"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let cache = Arc::new(MemoryCache::new());
    let coordinator = coordinator(
        &expander_config(4, 5.0),
        EligibilityFilter::allow_all(),
        Arc::clone(&cache),
    );

    let url = format!("{}/plain", server.uri());
    let report = coordinator.run(&[url.clone()]).await;

    assert_eq!(report.results, Some(vec![url]));
    assert_eq!(report.stats.expanded, 0);
    assert_eq!(report.stats.cached, 0);
    assert_eq!(report.stats.error, 0);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_pathless_url_without_redirect_is_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let cache = Arc::new(MemoryCache::new());
    let coordinator = coordinator(
        &expander_config(4, 5.0),
        EligibilityFilter::allow_all(),
        Arc::clone(&cache),
    );

    // No trailing slash: the parsed form adds one but nothing redirected
    let url = server.uri();
    assert!(!url.ends_with('/'));
    let report = coordinator.run(&[url.clone()]).await;

    assert_eq!(report.results, Some(vec![url]));
    assert_eq!(report.stats.expanded, 0);
    assert_eq!(report.stats.cached, 0);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_http_error_status_still_resolves() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let coordinator = coordinator(
        &expander_config(4, 5.0),
        EligibilityFilter::allow_all(),
        Arc::new(MemoryCache::new()),
    );

    let url = format!("{}/gone", server.uri());
    let report = coordinator.run(&[url.clone()]).await;

    assert_eq!(report.results, Some(vec![url]));
    assert_eq!(report.stats.error, 0);
}

#[tokio::test]
async fn test_order_preserved_across_mixed_outcomes() {
    let server = MockServer::start().await;
    for i in 0..6 {
        mount_redirect(&server, &format!("/s{}", i), &format!("/target{}", i)).await;
    }
    // Earlier URLs respond slower so completion order differs from input order
    Mock::given(method("HEAD"))
        .and(path_regex("^/slow[0-9]$"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(150)))
        .mount(&server)
        .await;

    let filter = EligibilityFilter::from_settings(None, Some(&["127.0.0.1"][..])).unwrap();
    let coordinator = coordinator(&expander_config(3, 5.0), filter, Arc::new(MemoryCache::new()));

    let mut urls = Vec::new();
    let mut expected = Vec::new();
    for i in 0..6 {
        let slow = format!("{}/slow{}", server.uri(), i);
        urls.push(slow.clone());
        expected.push(slow);

        urls.push(format!("{}/s{}", server.uri(), i));
        expected.push(format!("{}/target{}", server.uri(), i));

        let ignored = format!("http://example.com/{}", i);
        urls.push(ignored.clone());
        expected.push(ignored);
    }

    let report = coordinator.run(&urls).await;

    assert_eq!(report.results, Some(expected));
    assert_eq!(report.stats.ignored, 6);
    assert_eq!(report.stats.expanded, 6);
}

#[tokio::test]
async fn test_length_limit_wins_over_domain_match() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let long_url = format!("{}/{}", server.uri(), "x".repeat(64));
    let filter = EligibilityFilter::from_settings(Some(40), Some(&["127.0.0.1"][..])).unwrap();
    let coordinator = coordinator(&expander_config(4, 5.0), filter, Arc::new(MemoryCache::new()));

    let report = coordinator.run(&[long_url.clone()]).await;

    assert_eq!(report.results, Some(vec![long_url]));
    assert_eq!(report.stats.ignored, 1);
}

#[tokio::test]
async fn test_domain_allow_list() {
    let server = MockServer::start().await;
    mount_redirect(&server, "/abc", "/landing").await;

    let filter = EligibilityFilter::from_settings(None, Some(&["127.0.0.1"][..])).unwrap();
    let coordinator = coordinator(&expander_config(4, 5.0), filter, Arc::new(MemoryCache::new()));

    let allowed = format!("{}/abc", server.uri());
    let other = "http://example.com/abc".to_string();
    let report = coordinator.run(&[allowed, other.clone()]).await;

    let results = report.results.unwrap();
    assert_eq!(results[0], format!("{}/landing", server.uri()));
    assert_eq!(results[1], other);
    assert_eq!(report.stats.ignored, 1);
    assert_eq!(report.stats.expanded, 1);
}

#[tokio::test]
async fn test_cache_short_circuits_network() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let short = format!("{}/x", server.uri());
    let cache = Arc::new(MemoryCache::with_entries([(
        short.clone(),
        "http://real.com/page".to_string(),
    )]));
    let coordinator = coordinator(&expander_config(4, 5.0), EligibilityFilter::allow_all(), cache);

    let report = coordinator.run(&[short]).await;

    assert_eq!(report.results, Some(vec!["http://real.com/page".to_string()]));
    assert_eq!(report.stats.cached_retrieved, 1);
    assert_eq!(report.stats.expanded, 0);
}

#[tokio::test]
async fn test_second_run_served_from_cache() {
    let server = MockServer::start().await;
    for i in 0..3 {
        let location = format!("{}/t{}", server.uri(), i);
        Mock::given(method("HEAD"))
            .and(path(format!("/s{}", i)))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", location.as_str()))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("HEAD"))
        .and(path_regex("^/t[0-9]$"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let filter = EligibilityFilter::from_settings(None, Some(&["127.0.0.1"][..])).unwrap();
    let coordinator = coordinator(&expander_config(4, 5.0), filter, Arc::new(MemoryCache::new()));

    let mut urls: Vec<String> = (0..3).map(|i| format!("{}/s{}", server.uri(), i)).collect();
    urls.push("http://example.com/ignored".to_string());

    let first = coordinator.run(&urls).await;
    let second = coordinator.run(&urls).await;

    assert_eq!(first.stats.expanded, 3);
    assert_eq!(first.stats.cached, 3);
    assert_eq!(second.stats.expanded, 0);
    assert_eq!(second.stats.cached_retrieved, 3);
    assert_eq!(second.stats.ignored, 1);
    assert_eq!(first.results, second.results);
}

#[tokio::test]
async fn test_timeout_counts_as_error_and_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let coordinator = coordinator(
        &expander_config(4, 0.2),
        EligibilityFilter::allow_all(),
        Arc::new(MemoryCache::new()),
    );

    let url = format!("{}/slow", server.uri());
    let report = coordinator.run(&[url.clone()]).await;

    assert_eq!(report.results, Some(vec![url]));
    assert_eq!(report.stats.error, 1);
    assert_eq!(report.stats.timeout, 1);
}

#[tokio::test]
async fn test_redirect_loop_is_an_error() {
    let server = MockServer::start().await;
    let location = format!("{}/loop", server.uri());
    Mock::given(method("HEAD"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", location.as_str()))
        .mount(&server)
        .await;

    let coordinator = coordinator(
        &expander_config(4, 5.0),
        EligibilityFilter::allow_all(),
        Arc::new(MemoryCache::new()),
    );

    let url = format!("{}/loop", server.uri());
    let report = coordinator.run(&[url.clone()]).await;

    assert_eq!(report.results, Some(vec![url]));
    assert_eq!(report.stats.error, 1);
    assert_eq!(report.stats.timeout, 0);
}

#[tokio::test]
async fn test_failure_does_not_affect_other_urls() {
    let server = MockServer::start().await;
    mount_redirect(&server, "/ok", "/dest").await;

    let closed_port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let coordinator = coordinator(
        &expander_config(4, 5.0),
        EligibilityFilter::allow_all(),
        Arc::new(MemoryCache::new()),
    );

    let urls = vec![
        format!("http://127.0.0.1:{}/x", closed_port),
        "not a url".to_string(),
        format!("{}/ok", server.uri()),
    ];
    let report = coordinator.run(&urls).await;

    let results = report.results.unwrap();
    assert_eq!(results[0], urls[0]);
    assert_eq!(results[1], urls[1]);
    assert_eq!(results[2], format!("{}/dest", server.uri()));
    assert_eq!(report.stats.error, 2);
    assert_eq!(report.stats.expanded, 1);
}

#[tokio::test]
async fn test_concurrency_cap_bounds_wall_time() {
    let delay = Duration::from_millis(200);
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).set_delay(delay))
        .expect(10)
        .mount(&server)
        .await;

    let coordinator = coordinator(
        &expander_config(2, 5.0),
        EligibilityFilter::allow_all(),
        Arc::new(MemoryCache::new()),
    );
    let urls: Vec<String> = (0..10).map(|i| format!("{}/u{}", server.uri(), i)).collect();

    let start = Instant::now();
    let report = coordinator.run(&urls).await;
    let elapsed = start.elapsed();

    assert_eq!(report.results, Some(urls));
    // ceil(10 / 2) rounds of one delay each
    assert!(elapsed >= delay * 5, "finished too fast: {:?}", elapsed);
    assert!(elapsed < delay * 10, "cap not parallel enough: {:?}", elapsed);
}

#[tokio::test]
async fn test_wide_cap_runs_requests_together() {
    let delay = Duration::from_millis(200);
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).set_delay(delay))
        .mount(&server)
        .await;

    let coordinator = coordinator(
        &expander_config(10, 5.0),
        EligibilityFilter::allow_all(),
        Arc::new(MemoryCache::new()),
    );
    let urls: Vec<String> = (0..10).map(|i| format!("{}/u{}", server.uri(), i)).collect();

    let start = Instant::now();
    coordinator.run(&urls).await;
    let elapsed = start.elapsed();

    assert!(elapsed < delay * 5, "requests were serialized: {:?}", elapsed);
}

#[tokio::test]
async fn test_interrupt_abandons_batch() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let coordinator = coordinator(
        &expander_config(2, 30.0),
        EligibilityFilter::from_settings(None, Some(&["127.0.0.1"][..])).unwrap(),
        Arc::new(MemoryCache::new()),
    );
    let mut urls: Vec<String> = (0..4).map(|i| format!("{}/u{}", server.uri(), i)).collect();
    urls.push("http://example.com/ignored".to_string());

    let start = Instant::now();
    let report = coordinator
        .run_until(&urls, tokio::time::sleep(Duration::from_millis(200)))
        .await;

    assert!(report.interrupted);
    assert!(report.results.is_none());
    assert_eq!(report.stats.ignored, 1);
    assert_eq!(report.stats.expanded, 0);
    assert!(start.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_sqlite_cache_persists_between_coordinators() {
    let server = MockServer::start().await;
    let location = format!("{}/long", server.uri());
    Mock::given(method("HEAD"))
        .and(path("/short"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", location.as_str()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/long"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("cache.db");
    let urls = vec![format!("{}/short", server.uri())];
    let config = expander_config(4, 5.0);

    let first = {
        let cache = Arc::new(SqliteCache::open(&db_path).unwrap());
        let coordinator =
            Coordinator::with_cache(&config, EligibilityFilter::allow_all(), cache).unwrap();
        coordinator.run(&urls).await
    };

    let cache = Arc::new(SqliteCache::open(&db_path).unwrap());
    let coordinator =
        Coordinator::with_cache(&config, EligibilityFilter::allow_all(), cache).unwrap();
    let second = coordinator.run(&urls).await;

    assert_eq!(first.stats.cached, 1);
    assert_eq!(second.stats.cached_retrieved, 1);
    assert_eq!(second.stats.expanded, 0);
    assert_eq!(second.results, Some(vec![format!("{}/long", server.uri())]));
}
