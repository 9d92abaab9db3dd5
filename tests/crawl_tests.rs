//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use std::sync::Arc;
use surface_scout::config::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use surface_scout::crawler::{
    run_crawl, CrawlEngine, DomExtractor, HttpFetcher, ProgressReporter,
};
use surface_scout::{InterruptController, StopReason};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at a mock server
fn create_test_config(start_url: &str) -> Config {
    Config {
        start_url: start_url.to_string(),
        crawler: CrawlerConfig {
            max_pages: None,
            max_depth: None,
            rate_interval_ms: 0, // No politeness delay against the mock
            include_patterns: vec![],
            exclude_patterns: vec![],
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            results_path: "./test-results.json".to_string(),
        },
    }
}

async fn mount_robots_allow_all(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /"))
        .mount(server)
        .await;
}

fn html_page(title: &str, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!(
            "<html><head><title>{}</title></head><body>{}</body></html>",
            title, body
        ))
        .insert_header("content-type", "text/html")
}

#[tokio::test]
async fn test_full_crawl_discovers_pages_and_elements() {
    let mock_server = MockServer::start().await;
    mount_robots_allow_all(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            "Home",
            r#"<a href="/page1">Page 1</a>
               <a href="/page2">Page 2</a>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1/"))
        .respond_with(html_page(
            "Page 1",
            r#"<form action="/search" method="get">
                 <input type="text" name="q" required>
                 <button type="submit">Search</button>
               </form>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2/"))
        .respond_with(html_page("Page 2", "<p>No links here</p>"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let results = run_crawl(&config, Arc::new(InterruptController::new()))
        .await
        .unwrap();

    assert_eq!(results.summary.total_pages, 3);
    assert_eq!(results.summary.errors, 0);
    assert_eq!(results.summary.stop_reason, Some(StopReason::Completed));
    assert!(!results.summary.interrupted);
    assert!(results.summary.end_time.is_some());

    assert_eq!(results.summary.total_forms, 1);
    assert_eq!(results.summary.total_buttons, 1);
    assert_eq!(results.summary.total_input_fields, 1);
    assert_eq!(results.forms[0].method, "GET");
    assert_eq!(results.input_fields[0].name.as_deref(), Some("q"));
    assert!(results.input_fields[0].required);

    // Pages come back in breadth-first order
    let titles: Vec<Option<&str>> = results.pages.iter().map(|p| p.title.as_deref()).collect();
    assert_eq!(titles, vec![Some("Home"), Some("Page 1"), Some("Page 2")]);

    // Robots.txt was served, so no degraded-mode warning
    assert!(results.warnings.is_empty());
}

#[tokio::test]
async fn test_max_pages_limit_stops_crawl() {
    let mock_server = MockServer::start().await;
    mount_robots_allow_all(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            "Home",
            r#"<a href="/a">A</a><a href="/b">B</a><a href="/c">C</a>"#,
        ))
        .mount(&mock_server)
        .await;
    for p in ["/a/", "/b/", "/c/"] {
        Mock::given(method("GET"))
            .and(path(p))
            .respond_with(html_page("Leaf", ""))
            .mount(&mock_server)
            .await;
    }

    let mut config = create_test_config(&mock_server.uri());
    config.crawler.max_pages = Some(1);
    let results = run_crawl(&config, Arc::new(InterruptController::new()))
        .await
        .unwrap();

    assert_eq!(
        results.summary.stop_reason,
        Some(StopReason::MaxPagesReached)
    );
    assert_eq!(results.summary.total_pages + results.summary.errors, 1);
    assert_eq!(results.pages.len(), 1);
    assert_eq!(results.summary.max_pages_limit, Some(1));
}

#[tokio::test]
async fn test_max_depth_prevents_deeper_fetches() {
    let mock_server = MockServer::start().await;
    mount_robots_allow_all(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("Home", r#"<a href="/depth1">D1</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/depth1/"))
        .respond_with(html_page("Depth 1", r#"<a href="/depth2">D2</a>"#))
        .mount(&mock_server)
        .await;

    // A depth-2 URL must never be requested
    Mock::given(method("GET"))
        .and(path("/depth2/"))
        .respond_with(html_page("Depth 2", ""))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri());
    config.crawler.max_depth = Some(1);
    let results = run_crawl(&config, Arc::new(InterruptController::new()))
        .await
        .unwrap();

    assert_eq!(results.summary.total_pages, 2);
    assert_eq!(results.summary.stop_reason, Some(StopReason::Completed));
    assert!(!results.pages.iter().any(|p| p.url.contains("depth2")));
}

#[tokio::test]
async fn test_robots_disallow_skips_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("User-agent: *\nDisallow: /private/"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            "Home",
            r#"<a href="/private/secret">secret</a><a href="/public">public</a>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/public/"))
        .respond_with(html_page("Public", ""))
        .mount(&mock_server)
        .await;

    // Disallowed URL must never be requested
    Mock::given(method("GET"))
        .and(path("/private/secret/"))
        .respond_with(html_page("Secret", ""))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let results = run_crawl(&config, Arc::new(InterruptController::new()))
        .await
        .unwrap();

    assert_eq!(results.summary.total_pages, 2);
    assert_eq!(results.summary.skipped, 1);
}

#[tokio::test]
async fn test_missing_robots_fails_open_with_warning() {
    let mock_server = MockServer::start().await;
    // No robots.txt mock: wiremock returns 404

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("Home", r#"<a href="/page">page</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page/"))
        .respond_with(html_page("Page", ""))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let results = run_crawl(&config, Arc::new(InterruptController::new()))
        .await
        .unwrap();

    // Everything stays crawlable and the degradation is observable
    assert_eq!(results.summary.total_pages, 2);
    assert_eq!(results.summary.stop_reason, Some(StopReason::Completed));
    assert_eq!(results.warnings.len(), 1);
    assert!(results.warnings[0].contains("robots.txt"));
}

#[tokio::test]
async fn test_server_error_recorded_and_crawl_continues() {
    let mock_server = MockServer::start().await;
    mount_robots_allow_all(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            "Home",
            r#"<a href="/broken">broken</a><a href="/fine">fine</a>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/fine/"))
        .respond_with(html_page("Fine", ""))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let results = run_crawl(&config, Arc::new(InterruptController::new()))
        .await
        .unwrap();

    assert_eq!(results.summary.total_pages, 2);
    assert_eq!(results.summary.errors, 1);
    assert_eq!(results.summary.stop_reason, Some(StopReason::Completed));

    let broken = results
        .pages
        .iter()
        .find(|p| p.url.contains("broken"))
        .unwrap();
    assert_eq!(broken.status, 500);
}

#[tokio::test]
async fn test_redirect_to_known_page_counts_as_skip() {
    let mock_server = MockServer::start().await;
    mount_robots_allow_all(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("Home", r#"<a href="/alias">alias</a>"#))
        .mount(&mock_server)
        .await;

    // The alias redirects back to the already-discovered start page
    Mock::given(method("GET"))
        .and(path("/alias/"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let results = run_crawl(&config, Arc::new(InterruptController::new()))
        .await
        .unwrap();

    assert_eq!(results.summary.total_pages, 1);
    assert_eq!(results.summary.skipped, 1);
    assert_eq!(results.pages.len(), 1);
}

#[tokio::test]
async fn test_429_retried_until_success() {
    let mock_server = MockServer::start().await;
    mount_robots_allow_all(&mock_server).await;

    // First attempt is throttled, the retry succeeds
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("Home", ""))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let results = run_crawl(&config, Arc::new(InterruptController::new()))
        .await
        .unwrap();

    assert_eq!(results.summary.total_pages, 1);
    assert_eq!(results.summary.errors, 0);
}

/// Reporter that requests an interrupt once enough pages are recorded
struct InterruptAfter {
    interrupt: Arc<InterruptController>,
    pages: u64,
}

impl ProgressReporter for InterruptAfter {
    fn report(&mut self, pages_processed: u64, _queue_depth: usize, _current_url: &str) {
        if pages_processed >= self.pages {
            self.interrupt.trigger();
        }
    }

    fn warn(&mut self, _message: &str) {}
}

#[tokio::test]
async fn test_interrupt_preserves_partial_results() {
    let mock_server = MockServer::start().await;
    mount_robots_allow_all(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            "Home",
            r#"<a href="/p1">1</a><a href="/p2">2</a><a href="/p3">3</a>
               <a href="/p4">4</a><a href="/p5">5</a>"#,
        ))
        .mount(&mock_server)
        .await;
    for p in ["/p1/", "/p2/", "/p3/", "/p4/", "/p5/"] {
        Mock::given(method("GET"))
            .and(path(p))
            .respond_with(html_page("Leaf", ""))
            .mount(&mock_server)
            .await;
    }

    let config = create_test_config(&mock_server.uri());
    let interrupt = Arc::new(InterruptController::new());
    let mut engine = CrawlEngine::new(
        &config,
        Box::new(HttpFetcher::new(&config.user_agent_string())),
        Box::new(DomExtractor::new()),
        Box::new(InterruptAfter {
            interrupt: Arc::clone(&interrupt),
            pages: 2,
        }),
        Arc::clone(&interrupt),
    )
    .unwrap();

    let results = engine.crawl().await.unwrap();

    // Signal observed with 2 pages recorded and more queued: exactly those
    // two pages survive, nothing dropped or duplicated
    assert!(results.summary.interrupted);
    assert_eq!(results.summary.stop_reason, Some(StopReason::Interrupted));
    assert_eq!(results.pages.len(), 2);
    assert_eq!(results.summary.total_pages, 2);
    assert!(results.summary.end_time.is_some());
}

#[tokio::test]
async fn test_include_exclude_precedence_end_to_end() {
    let mock_server = MockServer::start().await;
    mount_robots_allow_all(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            "Home",
            r#"<a href="/products/widget">widget</a>
               <a href="/products/hidden/secret">hidden</a>
               <a href="/blog/post">blog</a>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/products/widget/"))
        .respond_with(html_page("Widget", ""))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/products/hidden/secret/"))
        .respond_with(html_page("Secret", ""))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/blog/post/"))
        .respond_with(html_page("Blog", ""))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri());
    // The canonical start page must itself pass the include filter
    let canonical_root = format!("{}/", mock_server.uri());
    config.crawler.include_patterns = vec!["**/products/**".to_string(), canonical_root];
    config.crawler.exclude_patterns = vec!["**/products/hidden/**".to_string()];

    let results = run_crawl(&config, Arc::new(InterruptController::new()))
        .await
        .unwrap();

    assert_eq!(results.summary.total_pages, 2); // start page + widget
    assert_eq!(results.summary.skipped, 2); // hidden + blog
}
