// tests/crawl_tests.rs
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use leadgen_crawler::{CrawlError, CrawlMode, CrawlOptions, Crawler, ScrapingConfig};

fn test_config() -> ScrapingConfig {
    ScrapingConfig {
        user_agent: "Mozilla/5.0 (compatible; LeadgenCrawler/0.1; test)".into(),
        request_timeout_seconds: 5,
        rate_limit_delay_ms: 0,
        max_attempts: 3,
        backoff_base_ms: 10,
        max_fallback_links: 3,
    }
}

async fn mount_html(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .mount(server)
        .await;
}

const HOMEPAGE: &str = r#"<html><head>
    <meta name="description" content="We build widgets">
    </head><body>
    <h1 itemprop="name">Acme Inc.</h1>
    <a href="/contact">Contact us</a>
    <a href="/pricing">Pricing</a>
    </body></html>"#;

const CONTACT_PAGE: &str = r#"<html><body>
    <p>Reach us at jane@example.com or (555) 123-4567.</p>
    </body></html>"#;

#[tokio::test]
async fn profile_crawl_aggregates_homepage_and_contact_page() {
    let server = MockServer::start().await;
    mount_html(&server, "/", HOMEPAGE).await;
    mount_html(&server, "/contact", CONTACT_PAGE).await;

    let crawler = Crawler::new(test_config()).unwrap();
    let options = CrawlOptions {
        max_pages: 2,
        ..Default::default()
    };
    let outcome = crawler.crawl(&server.uri(), &options).await.unwrap();

    assert_eq!(outcome.pages_crawled, 2);
    assert!(outcome.contact_page_url.ends_with("/contact"));
    assert_eq!(outcome.records.len(), 1);

    let record = &outcome.records[0];
    assert_eq!(record.meta_description, "We build widgets");
    assert_eq!(record.email, "jane@example.com");
    assert_eq!(record.phone, "5551234567");
    assert_eq!(record.domain, "127.0.0.1");
    assert!(record.contact_page_url.ends_with("/contact"));
}

#[tokio::test]
async fn page_budget_is_respected() {
    let server = MockServer::start().await;
    let homepage = r#"<html><body>
        <a href="/a">A</a><a href="/b">B</a><a href="/c">C</a>
        </body></html>"#;
    mount_html(&server, "/", homepage).await;
    mount_html(&server, "/a", "<html><body>a</body></html>").await;
    mount_html(&server, "/b", "<html><body>b</body></html>").await;
    mount_html(&server, "/c", "<html><body>c</body></html>").await;

    let crawler = Crawler::new(test_config()).unwrap();
    let options = CrawlOptions {
        max_pages: 2,
        mode: CrawlMode::List,
        ..Default::default()
    };
    let outcome = crawler.crawl(&server.uri(), &options).await.unwrap();
    assert_eq!(outcome.pages_crawled, 2);
    assert_eq!(outcome.records.len(), 2);
}

#[tokio::test]
async fn missing_robots_txt_fails_open() {
    let server = MockServer::start().await;
    mount_html(&server, "/", "<html><body>open</body></html>").await;
    // No robots.txt mock mounted, so the server answers 404 for it.

    let crawler = Crawler::new(test_config()).unwrap();
    let outcome = crawler
        .crawl(&server.uri(), &CrawlOptions::default())
        .await
        .unwrap();
    assert_eq!(outcome.pages_crawled, 1);
}

#[tokio::test]
async fn disallow_all_robots_denies_the_seed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /\n"),
        )
        .mount(&server)
        .await;
    mount_html(&server, "/", "<html><body>hidden</body></html>").await;

    let crawler = Crawler::new(test_config()).unwrap();
    let err = crawler
        .crawl(&server.uri(), &CrawlOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CrawlError::PolicyDenied(_)));
}

#[tokio::test]
async fn robots_checks_can_be_disabled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /\n"),
        )
        .expect(0)
        .mount(&server)
        .await;
    mount_html(&server, "/", "<html><body>visible</body></html>").await;

    let crawler = Crawler::new(test_config()).unwrap();
    let options = CrawlOptions {
        respect_robots: false,
        ..Default::default()
    };
    let outcome = crawler.crawl(&server.uri(), &options).await.unwrap();
    assert_eq!(outcome.pages_crawled, 1);
}

#[tokio::test]
async fn seed_server_errors_retry_then_fail_the_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let crawler = Crawler::new(test_config()).unwrap();
    let err = crawler
        .crawl(&server.uri(), &CrawlOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CrawlError::FetchExhausted(_)));
    // Dropping the server verifies the .expect(3) attempt count.
}

#[tokio::test]
async fn seed_not_found_fails_without_retrying() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let crawler = Crawler::new(test_config()).unwrap();
    let err = crawler
        .crawl(&server.uri(), &CrawlOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CrawlError::FetchExhausted(_)));
}

#[tokio::test]
async fn failing_secondary_page_is_skipped() {
    let server = MockServer::start().await;
    let homepage = r#"<html><body><a href="/contact">Contact</a></body></html>"#;
    mount_html(&server, "/", homepage).await;
    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let crawler = Crawler::new(test_config()).unwrap();
    let options = CrawlOptions {
        max_pages: 2,
        ..Default::default()
    };
    let outcome = crawler.crawl(&server.uri(), &options).await.unwrap();
    assert_eq!(outcome.pages_crawled, 1);
    assert_eq!(outcome.records.len(), 1);
}

#[tokio::test]
async fn list_mode_yields_one_record_per_page() {
    let server = MockServer::start().await;
    let homepage = r#"<html><body>
        <p>home@example.com</p><a href="/team">Our team</a>
        </body></html>"#;
    let team = r#"<html><body><p>team@example.com</p></body></html>"#;
    mount_html(&server, "/", homepage).await;
    mount_html(&server, "/team", team).await;

    let crawler = Crawler::new(test_config()).unwrap();
    let options = CrawlOptions {
        max_pages: 2,
        mode: CrawlMode::List,
        ..Default::default()
    };
    let outcome = crawler.crawl(&server.uri(), &options).await.unwrap();
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[0].email, "home@example.com");
    assert_eq!(outcome.records[1].email, "team@example.com");
}

#[tokio::test]
async fn no_follow_stops_at_the_seed() {
    let server = MockServer::start().await;
    let homepage = r#"<html><body><a href="/contact">Contact</a></body></html>"#;
    mount_html(&server, "/", homepage).await;

    let crawler = Crawler::new(test_config()).unwrap();
    let options = CrawlOptions {
        max_pages: 5,
        follow_links: false,
        ..Default::default()
    };
    let outcome = crawler.crawl(&server.uri(), &options).await.unwrap();
    assert_eq!(outcome.pages_crawled, 1);
    assert!(outcome.contact_page_url.is_empty());
}

#[tokio::test]
async fn invalid_seed_is_rejected_up_front() {
    let crawler = Crawler::new(test_config()).unwrap();
    let err = crawler
        .crawl("not a url", &CrawlOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CrawlError::InvalidUrl(_)));
}
