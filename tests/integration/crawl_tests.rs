//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! discover, visit, resolve and write cycle end-to-end.

use post_harvest::config::{load_config, Config};
use post_harvest::output::write_csv;
use post_harvest::{Coordinator, CrawlMode};
use serde_json::json;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing every site URL at the mock server
fn create_test_config(base_url: &str) -> Config {
    let host = url::Url::parse(base_url)
        .expect("Failed to parse base URL")
        .host_str()
        .expect("Failed to extract host")
        .to_string();

    let mut config = Config::default();
    config.site.listing_url = format!("{}/blogs/", base_url);
    config.site.collection_endpoint = format!("{}/wp-json/wp/v2/posts", base_url);
    config.site.content_host = host;
    config.crawler.concurrency = 2;
    config.crawler.navigation_timeout_ms = 5_000;
    config.comments.widget_timeout_ms = 200;
    config.comments.widget_poll_interval_ms = 20;
    config
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(body)
}

fn article_page(base_url: &str, title: &str, extra: &str) -> String {
    format!(
        r#"<html><head><title>{title} | Blog</title></head><body>
            <nav><a href="/blogs/">Blogs</a></nav>
            <article>
                <h1>{title}</h1>
                <div class="article__body">
                    <p>First paragraph of {title}.</p>
                    <ul><li>Point one</li></ul>
                    <img data-src="{base_url}/wp-content/uploads/2024/01/{slug}.jpg?w=800">
                    <div class="share-tools-mod"><p>Share this</p></div>
                </div>
            </article>
            {extra}
        </body></html>"#,
        title = title,
        base_url = base_url,
        slug = title.to_lowercase().replace(' ', "-"),
        extra = extra,
    )
}

#[tokio::test]
async fn test_listing_crawl_end_to_end() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Listing page with two articles, an archive link and a duplicate
    Mock::given(method("GET"))
        .and(path("/blogs/"))
        .respond_with(html(format!(
            r#"<html><body>
                <a href="{base}/blogs/category/news/">News category</a>
                <div class="post">
                    <h2><a href="/blogs/entry/first-post/">First Post</a></h2>
                    <span class="byline">by Riley</span>
                    <time datetime="2024-01-10T12:00:00">Jan 10</time>
                </div>
                <div class="post">
                    <h2><a href="/blogs/entry/broken-post/">Broken Post</a></h2>
                    <span class="byline">by Morgan</span>
                    <time datetime="2024-01-09T08:00:00">Jan 9</time>
                </div>
                <a href="/blogs/entry/first-post/">First Post again</a>
            </body></html>"#,
            base = base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/blogs/entry/first-post/"))
        .respond_with(html(article_page(
            &base_url,
            "First Post",
            r#"<section id="comments"><h3>5 Comments</h3></section>"#,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/blogs/entry/broken-post/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url);
    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let rows = coordinator
        .run(CrawlMode::Listing)
        .await
        .expect("Crawl failed");

    assert_eq!(rows.len(), 2);

    let first = &rows[0];
    assert_eq!(first.title, "First Post");
    assert_eq!(first.author, "Riley");
    assert_eq!(first.time, "2024-01-10T12:00:00");
    assert_eq!(first.comment_count, 5);
    assert_eq!(
        first.article_content,
        "First paragraph of First Post.\n\n- Point one"
    );
    assert_eq!(
        first.media_urls,
        vec![format!("{}/wp-content/uploads/2024/01/first-post.jpg", base_url)]
    );

    // The failed visit keeps its listing seeds and nothing else
    let broken = &rows[1];
    assert_eq!(broken.title, "Broken Post");
    assert_eq!(broken.author, "Morgan");
    assert_eq!(broken.time, "2024-01-09T08:00:00");
    assert_eq!(broken.comment_count, 0);
    assert!(broken.is_content_empty());

    // Write and read back the CSV
    let dir = TempDir::new().expect("Failed to create temp dir");
    let out = dir.path().join("posts.csv");
    write_csv(&out, &rows).expect("Failed to write CSV");

    let content = std::fs::read_to_string(&out).expect("Failed to read CSV");
    let content = content.trim_start_matches('\u{feff}');
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some(r#""Title","Author","Comment Count","Time","Article Content","Images In Article","Image Count""#)
    );
    assert!(content.contains(r#""First Post","Riley","5","2024-01-10T12:00:00","First paragraph"#));
    assert!(content.contains(r#""Broken Post","Morgan","0","2024-01-09T08:00:00","","","0""#));
}

#[tokio::test]
async fn test_full_corpus_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/posts"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-wp-totalpages", "2")
                .set_body_json(json!([
                    {"link": format!("{}/blogs/entry/newest/", base_url), "date": "2024-03-01T09:00:00"}
                ])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/posts"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-wp-totalpages", "2")
                .set_body_json(json!([
                    {"link": format!("{}/blogs/entry/oldest/", base_url), "date": "2022-06-01T09:00:00"}
                ])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    // The page carries no time markup, so the collection date is used
    Mock::given(method("GET"))
        .and(path("/blogs/entry/newest/"))
        .respond_with(html(
            r#"<html><body><h1>Newest by Avery</h1><article><p>Hello</p></article></body></html>"#
                .to_string(),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/blogs/entry/oldest/"))
        .respond_with(html("<html></html>".to_string()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url);
    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let since = post_harvest::discovery::parse_timestamp("2023-01-01").ok();
    let rows = coordinator
        .run(CrawlMode::FullCorpus { since })
        .await
        .expect("Crawl failed");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Newest");
    assert_eq!(rows[0].author, "Avery");
    assert_eq!(rows[0].time, "2024-03-01T09:00:00");
    assert_eq!(rows[0].article_content, "Hello");
}

#[tokio::test]
async fn test_discussion_widget_count() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // The article has no label of its own; the count lives in the widget frame
    Mock::given(method("GET"))
        .and(path("/blogs/entry/quiet/"))
        .respond_with(html(format!(
            r#"<html><body>
                <article><h1>Quiet post</h1><p>Text</p></article>
                <iframe src="{}/embed/comments/?f=blog"></iframe>
            </body></html>"#,
            base_url
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/embed/comments/"))
        .respond_with(html(
            r#"<html><body><div><span>9 Comment(s)</span></div></body></html>"#.to_string(),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base_url);
    config.comments.widget_domains = vec!["127.0.0.1".to_string()];
    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");

    let rows = coordinator
        .run(CrawlMode::Explicit(vec![format!(
            "{}/blogs/entry/quiet/",
            base_url
        )]))
        .await
        .expect("Crawl failed");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].comment_count, 9);
}

#[test]
fn test_config_file_overrides_defaults() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(
        file,
        r#"
[crawler]
concurrency = 4
max-listing-links = 5

[site]
content-host = "blog.example.org"

[comments]
widget-domains = ["disqus.com", "comments.example.org"]
"#
    )
    .expect("Failed to write config");

    let config = load_config(file.path()).expect("Failed to load config");

    assert_eq!(config.crawler.concurrency, 4);
    assert_eq!(config.crawler.max_listing_links, 5);
    assert_eq!(config.site.content_host, "blog.example.org");
    assert_eq!(config.site.article_path, "/blogs/entry/");
    assert_eq!(config.comments.widget_domains.len(), 2);
    assert_eq!(config.crawler.navigation_timeout_ms, 30_000);
}
