use wiremock::MockServer;

use crate::helpers::spawn_app;
use crate::helpers::spawn_app_with;
use crate::helpers::test_configuration;

#[tokio::test]
async fn feed_lists_published_articles() {
    let app = spawn_app("netlify").await;

    let resp = app.get_feed().await;

    assert_eq!(resp.status().as_u16(), 200);
    let content_type = resp.headers()["content-type"].to_str().unwrap().to_owned();
    assert!(content_type.starts_with("application/rss+xml"));

    let xml = resp.text().await.unwrap();
    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains(r#"<rss version="2.0">"#));
    assert_eq!(xml.matches("<item>").count(), 2);
    assert!(!xml.contains("Unfinished thoughts"));

    let second = xml.find("Second post").unwrap();
    let first = xml.find("First post").unwrap();
    assert!(second < first, "newest first");

    assert!(xml.contains("<link>https://blog.example.com/blog/first-post/</link>"));
    assert!(xml.contains("<pubDate>Sun, 10 Mar 2024 09:00:00 +0000</pubDate>"));
    assert!(xml.contains("<category>feeds</category>"));
}

#[tokio::test]
async fn feed_works_without_provider_config() {
    let app = spawn_app("sendgrid").await;

    assert_eq!(app.get_feed().await.status().as_u16(), 200);
}

#[tokio::test]
async fn feed_missing_content_dir_returns_500() {
    let provider_server = MockServer::start().await;
    let mut cfg = test_configuration("netlify", &provider_server);
    cfg.feed.content_dir = "tests/fixtures/does-not-exist".into();
    let app = spawn_app_with(cfg, provider_server).await;

    assert_eq!(app.get_feed().await.status().as_u16(), 500);
}
