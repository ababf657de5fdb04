use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use flate2::write::GzEncoder;
use flate2::Compression;
use mockito::{mock, Matcher};
use serp_crawler::{CrawlConfig, CrawlError, Crawler, FixedPicker, PageType, RedirectOutcome};

const BAIDU_PAGE: &str = r#"
<html><body>
<div id="results">
    <div class="c-result" data-log="{'order':1,'mu':'https://www.rust-lang.org/'}">
        <div class="c-result-content">
            <h3>Rust Programming Language</h3>
            <div class="c-line-clamp3"><span class="c-gap-right-small">2024-05-01</span><span>A language empowering everyone</span></div>
            <div class="c-line-clamp1"><span>rust-lang.org</span></div>
        </div>
    </div>
    <div class="c-result" data-log="{'order':2,'mu':'https://doc.rust-lang.org/book/'}">
        <div class="c-result-content">
            <h3>The Rust Book</h3>
            <div class="c-line-clamp3"><span>Learn Rust</span></div>
            <div class="c-line-clamp1"><span>doc.rust-lang.org</span></div>
        </div>
    </div>
</div>
<div class="rw-list-container"><span>rust 教程</span></div>
<div class="span-item"><span>cargo</span></div>
</body></html>
"#;

const SHENMA_PAGE: &str = r#"
<html><body>
<div id="results">
    <div class="sc">
        <a class="c-header-inner" href="https://crates.io/">
            <div class="c-header-title"><span>crates.io</span></div>
        </a>
        <p class="js-c-paragraph-text">The Rust community's crate registry</p>
        <div class="c-e-source-l"><span>crates.io</span><span>1 day ago</span></div>
    </div>
</div>
<div class="news-title">rust crates</div>
<span class="c-e-btn-text">cargo add</span>
</body></html>
"#;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn fast_config() -> CrawlConfig {
    CrawlConfig {
        retry_attempts: 3,
        retry_delay: Duration::from_millis(10),
        request_timeout: Duration::from_secs(5),
        user_agent: Some("serp-crawler-test".to_string()),
    }
}

fn crawler() -> Crawler {
    Crawler::with_picker(fast_config(), Arc::new(FixedPicker(0))).unwrap()
}

fn url(path: &str) -> String {
    format!("{}{}", mockito::server_url(), path)
}

fn gzip(data: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

#[tokio::test]
async fn test_baidu_word_and_sort_from_plain_body() {
    init_tracing();
    let m = mock("GET", "/baidu/plain")
        .match_header("accept", "*/*")
        .match_header("accept-encoding", "gzip")
        .match_header("user-agent", "serp-crawler-test")
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(BAIDU_PAGE)
        .create();

    let (words, sites) = crawler()
        .baidu_word_and_sort(&url("/baidu/plain"), &[])
        .await
        .unwrap();

    m.assert();
    assert_eq!(words, vec!["rust 教程", "cargo"]);
    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0].rank, 1);
    assert_eq!(sites[0].title, "Rust Programming Language");
    assert_eq!(sites[0].page_type(), PageType::Homepage);
    assert_eq!(sites[1].rank, 2);
    assert_eq!(sites[1].resolved_link(), "https://doc.rust-lang.org/book/");
    assert_eq!(sites[1].page_type(), PageType::InnerPage);
}

#[tokio::test]
async fn test_gzip_and_plain_bodies_extract_identically() {
    init_tracing();
    let plain = mock("GET", "/shenma/plain")
        .with_status(200)
        .with_body(SHENMA_PAGE)
        .create();
    let zipped = mock("GET", "/shenma/gzip")
        .with_status(200)
        .with_header("content-encoding", "gzip")
        .with_body(gzip(SHENMA_PAGE))
        .create();

    let crawler = crawler();
    let from_plain = crawler
        .shenma_word_and_sort(&url("/shenma/plain"), &[])
        .await
        .unwrap();
    let from_gzip = crawler
        .shenma_word_and_sort(&url("/shenma/gzip"), &[])
        .await
        .unwrap();

    plain.assert();
    zipped.assert();
    assert_eq!(from_plain, from_gzip);
    assert_eq!(from_plain.0, vec!["rust crates", "cargo add"]);
    assert_eq!(from_plain.1[0].rank, 0);
    assert_eq!(from_plain.1[0].timestamp_text, "1 day ago");
}

#[tokio::test]
async fn test_server_error_is_retried_three_times() {
    init_tracing();
    let m = mock("GET", "/retry/500")
        .with_status(500)
        .expect(3)
        .create();

    let err = crawler()
        .baidu_sort_list(&url("/retry/500"), &[])
        .await
        .unwrap_err();

    m.assert();
    assert!(matches!(err, CrawlError::UnexpectedStatus { code: 500 }));
}

#[tokio::test]
async fn test_bad_request_is_retried() {
    init_tracing();
    let m = mock("GET", "/retry/400")
        .with_status(400)
        .expect(3)
        .create();

    let err = crawler()
        .shenma_word_list(&url("/retry/400"), &[])
        .await
        .unwrap_err();

    m.assert();
    assert_eq!(err.status_code(), Some(400));
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    init_tracing();
    let m = mock("GET", "/missing").with_status(404).expect(1).create();

    let err = crawler()
        .baidu_word_list(&url("/missing"), &[])
        .await
        .unwrap_err();

    m.assert();
    assert!(matches!(err, CrawlError::UnexpectedStatus { code: 404 }));
}

#[tokio::test]
async fn test_page_without_matches_yields_empty_lists() {
    init_tracing();
    let _m = mock("GET", "/empty")
        .with_status(200)
        .with_body("<html><body><p>no results</p></body></html>")
        .create();

    let (words, sites) = crawler()
        .baidu_word_and_sort(&url("/empty"), &[])
        .await
        .unwrap();

    assert!(words.is_empty());
    assert!(sites.is_empty());
}

#[tokio::test]
async fn test_corrupt_gzip_body_is_malformed() {
    init_tracing();
    let mut body = gzip(BAIDU_PAGE);
    body.truncate(16);
    let _m = mock("GET", "/corrupt")
        .with_status(200)
        .with_body(body)
        .create();

    let err = crawler()
        .baidu_word_list(&url("/corrupt"), &[])
        .await
        .unwrap_err();

    assert!(matches!(err, CrawlError::MalformedDocument(_)));
}

#[tokio::test]
async fn test_unreachable_proxy_is_transport_error() {
    init_tracing();
    // Reachable directly, so only the proxy can make this fail.
    let m = mock("GET", "/behind/proxy").with_status(200).expect(0).create();
    let proxies = vec!["http://127.0.0.1:9".to_string()];

    let err = crawler()
        .shenma_sort_list(&url("/behind/proxy"), &proxies)
        .await
        .unwrap_err();

    m.assert();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_request_goes_through_picked_proxy() {
    init_tracing();
    // The mock server acts as the proxy; the target host does not resolve.
    let m = mock("GET", Matcher::Regex(r"/proxied/page$".to_string()))
        .match_header("accept-encoding", "gzip")
        .with_status(200)
        .with_body(SHENMA_PAGE)
        .expect(1)
        .create();
    let proxies = vec![mockito::server_url()];

    let words = crawler()
        .shenma_word_list("http://shenma.invalid/proxied/page", &proxies)
        .await
        .unwrap();

    m.assert();
    assert_eq!(words, vec!["rust crates", "cargo add"]);
}

#[tokio::test]
async fn test_resolve_real_link_reads_redirect_target() {
    init_tracing();
    let m = mock("GET", "/link/absolute")
        .with_status(302)
        .with_header("location", "https://www.example.com/landing")
        .expect(1)
        .create();

    let link = crawler()
        .resolve_real_link(&url("/link/absolute"), &[])
        .await;

    m.assert();
    assert_eq!(link, "https://www.example.com/landing");
}

#[tokio::test]
async fn test_resolve_real_link_joins_relative_location() {
    init_tracing();
    let _m = mock("GET", "/link/relative")
        .with_status(301)
        .with_header("location", "/landing?id=7")
        .create();

    let link = crawler()
        .resolve_real_link(&url("/link/relative"), &[])
        .await;

    assert_eq!(link, url("/landing?id=7"));
}

#[tokio::test]
async fn test_resolve_real_link_without_redirect_is_empty() {
    init_tracing();
    let _m = mock("GET", "/link/direct")
        .with_status(200)
        .with_body("direct")
        .create();

    let crawler = crawler();
    let outcome = crawler
        .fetcher()
        .probe_redirect(&url("/link/direct"), &[])
        .await
        .unwrap();
    assert!(!outcome.is_denied());
    assert!(matches!(outcome, RedirectOutcome::NotRedirected { .. }));

    assert_eq!(crawler.resolve_real_link(&url("/link/direct"), &[]).await, "");
}

#[tokio::test]
async fn test_resolve_sites_replaces_redirect_links() {
    init_tracing();
    let _redirect = mock("GET", "/click/1")
        .with_status(302)
        .with_header("location", "https://www.example.com/article/1")
        .create();
    let page = SHENMA_PAGE.replace("https://crates.io/", &url("/click/1"));
    let _page = mock("GET", "/shenma/tracked")
        .with_status(200)
        .with_body(page)
        .create();

    let crawler = crawler();
    let sites = crawler
        .shenma_sort_list(&url("/shenma/tracked"), &[])
        .await
        .unwrap();
    let sites = crawler.resolve_sites(sites, &[]).await;

    assert_eq!(sites[0].resolved_link(), "https://www.example.com/article/1");
    assert_eq!(sites[0].page_type(), PageType::InnerPage);
}
