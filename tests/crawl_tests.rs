//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use site_search::config::Config;
use site_search::crawler::{run_crawl, Coordinator, CrawlReport};
use site_search::index::build_from_store;
use site_search::storage::{CrawlStore, MemoryStorage, SqliteStorage, FINISHED_PROPERTY};
use site_search::url::Scope;
use site_search::QueryEngine;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration that does not retry
fn create_test_config() -> Config {
    let mut config = Config::default();
    config.crawler.max_retries = 0;
    config.crawler.retry_backoff_ms = 1;
    config.crawler.request_timeout_secs = 5;
    config.user_agent.crawler_name = "TestBot".to_string();
    config
}

/// Mounts an HTML page at `page_path`
async fn mount_html(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .mount(server)
        .await;
}

/// Crawls from one seed into a fresh in-memory store
async fn crawl_from(seed: &str) -> (CrawlReport, MemoryStorage) {
    let config = create_test_config();
    let seeds = [seed];
    let scope = Scope::from_seeds(&seeds).expect("valid seed");
    let mut store = MemoryStorage::default();
    let report = run_crawl(&config, scope, &seeds, &mut store)
        .await
        .expect("crawl should complete");
    (report, store)
}

#[tokio::test]
async fn test_crawl_stays_within_prefix() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(
        &mock_server,
        "/docs/",
        r#"<html><head><title>Docs home</title></head><body>
            <p>Look at the zebra.</p>
            <a href="b.html">B</a>
            <a href="/other/c.html">C</a>
        </body></html>"#
            .to_string(),
    )
    .await;

    mount_html(
        &mock_server,
        "/docs/b.html",
        r#"<html><head><title>B</title></head><body>
            <h1>Zebra</h1>
            <p>Stripes everywhere.</p>
            <a href="/docs/">Back</a>
        </body></html>"#
            .to_string(),
    )
    .await;

    // Out of scope, must never be requested
    Mock::given(method("GET"))
        .and(path("/other/c.html"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>zebra</p>", "text/html"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (report, store) = crawl_from(&format!("{}/docs/", base_url)).await;

    assert_eq!(report.fetched, 2);
    assert_eq!(report.stored, 2);

    let mut visited = store.visited_urls().unwrap();
    visited.sort();
    assert_eq!(
        visited,
        vec![
            format!("{}/docs/", base_url),
            format!("{}/docs/b.html", base_url)
        ]
    );

    let records = store.load_pages().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].url, format!("{}/docs/", base_url));
    assert_eq!(records[1].url, format!("{}/docs/b.html", base_url));
    assert!(store.is_finished().unwrap());

    // B has "zebra" in its h1, A only in body text
    let engine = QueryEngine::new(build_from_store(&store).unwrap());
    let results = engine.query("zebra");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].url, format!("{}/docs/b.html", base_url));
    assert_eq!(results[0].title, "B");
}

#[tokio::test]
async fn test_equivalent_links_fetched_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(
        &mock_server,
        "/",
        format!(
            r##"<a href="page">One</a>
            <a href="page#section">Two</a>
            <a href=" {}/page ">Three</a>
            <a href="/page?">Four</a>"##,
            base_url
        ),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"<a href="/">Home</a>"#, "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let (report, store) = crawl_from(&format!("{}/", base_url)).await;

    assert_eq!(report.fetched, 2);
    assert_eq!(store.count_pages().unwrap(), 2);
}

#[tokio::test]
async fn test_redirect_stored_under_final_url() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(
        &mock_server,
        "/docs/",
        r#"<a href="old.html">Old</a><a href="out.html">Out</a>"#.to_string(),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/docs/old.html"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/docs/new.html"))
        .mount(&mock_server)
        .await;

    mount_html(&mock_server, "/docs/new.html", "<h1>New home</h1>".to_string()).await;

    // Redirects out of the allowed prefix
    Mock::given(method("GET"))
        .and(path("/docs/out.html"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/elsewhere/"))
        .mount(&mock_server)
        .await;

    mount_html(&mock_server, "/elsewhere/", "<p>outside</p>".to_string()).await;

    let (report, store) = crawl_from(&format!("{}/docs/", base_url)).await;

    assert_eq!(report.stored, 2);
    assert_eq!(report.rejected, 1);

    let urls: Vec<String> = store
        .load_pages()
        .unwrap()
        .into_iter()
        .map(|record| record.url)
        .collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/docs/", base_url),
            format!("{}/docs/new.html", base_url)
        ]
    );

    assert!(store.is_visited(&format!("{}/docs/old.html", base_url)).unwrap());
    assert!(store.is_visited(&format!("{}/docs/new.html", base_url)).unwrap());
    assert!(store.is_visited(&format!("{}/docs/out.html", base_url)).unwrap());
    assert!(!store.is_visited(&format!("{}/elsewhere/", base_url)).unwrap());
}

#[tokio::test]
async fn test_unsupported_responses_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(
        &mock_server,
        "/",
        r#"<a href="/notes">Notes</a>
           <a href="/data">Data</a>
           <a href="/missing">Missing</a>
           <a href="/photo.PNG">Photo</a>"#
            .to_string(),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/notes"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("plain <a href=\"/hidden\">text</a>", "text/plain"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"ok":true}"#, "application/json"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_raw("gone", "text/html"))
        .mount(&mock_server)
        .await;

    // Blocked extension, and links inside plain text are not followed
    for never in ["/photo.PNG", "/hidden"] {
        Mock::given(method("GET"))
            .and(path(never))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;
    }

    let (report, store) = crawl_from(&format!("{}/", base_url)).await;

    assert_eq!(report.fetched, 4);
    assert_eq!(report.stored, 2);
    assert_eq!(report.skipped, 2);

    let records = store.load_pages().unwrap();
    assert_eq!(records[1].url, format!("{}/notes", base_url));
    assert_eq!(records[1].body, "plain <a href=\"/hidden\">text</a>");

    // Skipped pages are not marked visited
    assert!(!store.is_visited(&format!("{}/data", base_url)).unwrap());
    assert!(!store.is_visited(&format!("{}/missing", base_url)).unwrap());
}

#[tokio::test]
async fn test_crawl_persists_to_sqlite() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("crawldb.sqlite3");

    mount_html(&mock_server, "/", r#"<a href="/a">A</a>"#.to_string()).await;
    mount_html(&mock_server, "/a", "<title>A</title>".to_string()).await;

    let config = create_test_config();
    let seeds = [format!("{}/", base_url)];

    {
        let mut store = SqliteStorage::new(&db_path).unwrap();
        let scope = Scope::from_seeds(&seeds).unwrap();
        let report = run_crawl(&config, scope, &seeds, &mut store).await.unwrap();
        assert_eq!(report.stored, 2);
    }

    let mut store = SqliteStorage::new(&db_path).unwrap();
    assert_eq!(store.count_pages().unwrap(), 2);
    assert_eq!(store.get_property(FINISHED_PROPERTY).unwrap(), Some(true));

    // A second run over the same store finds nothing new to fetch
    let scope = Scope::from_seeds(&seeds).unwrap();
    let mut coordinator =
        Coordinator::new(&config.crawler, &config.user_agent, scope, &mut store).unwrap();
    assert_eq!(coordinator.seed(&seeds).unwrap(), 0);
    let report = coordinator.run().await.unwrap();
    assert_eq!(report, CrawlReport::default());
}

#[tokio::test]
async fn test_multiple_seeds_and_prefixes() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(&mock_server, "/en/", r#"<a href="/fr/">Français</a>"#.to_string()).await;
    mount_html(&mock_server, "/de/", r#"<a href="/de/seite">Seite</a>"#.to_string()).await;
    mount_html(&mock_server, "/de/seite", "<p>Inhalt</p>".to_string()).await;

    Mock::given(method("GET"))
        .and(path("/fr/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>non</p>", "text/html"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config();
    let seeds = [format!("{}/en/", base_url), format!("{}/de/", base_url)];
    let scope = Scope::from_seeds(&seeds).unwrap();
    let mut store = MemoryStorage::default();

    let report = run_crawl(&config, scope, &seeds, &mut store).await.unwrap();

    assert_eq!(report.stored, 3);
    let urls: Vec<String> = store
        .load_pages()
        .unwrap()
        .into_iter()
        .map(|record| record.url)
        .collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/en/", base_url),
            format!("{}/de/", base_url),
            format!("{}/de/seite", base_url)
        ]
    );
}
