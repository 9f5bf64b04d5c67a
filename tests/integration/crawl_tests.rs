//! Integration tests for the crawler
//!
//! These tests use wiremock to stand up a small help center and drive the
//! full category → section → article crawl against it, plus the corpus
//! store and the retrieval-QA providers.

use helphub::config::{parse_config, Config};
use helphub::corpus::build_records;
use helphub::crawler::{ensure_corpus, CorpusSource, CrawlLevel, TreeCrawler};
use helphub::rag::{
    ask, ChatModel, Embedder, InMemoryIndex, RetrievalQa, TogetherClient, FALLBACK_ANSWER,
};
use helphub::storage::{CorpusStore, JsonCorpusStore};
use helphub::HelpHubError;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(server: &MockServer, fetcher: &str, corpus_path: &str) -> Config {
    parse_config(&format!(
        r#"
[site]
base-url = "{}/"

[fetcher]
{}

[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0.0"
contact-url = "https://example.com/contact"
contact-email = "test@example.com"

[output]
corpus-path = "{}"

[rag]
index-name = "test-index"
dimension = 3
top-k = 1
api-base-url = "{}/v1"
"#,
        server.uri(),
        fetcher,
        corpus_path,
        server.uri()
    ))
    .expect("Failed to parse test config")
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html(body))
        .mount(server)
        .await;
}

fn category_link(href: &str, title: &str) -> String {
    format!(r#"<a class="blocks-item-link" href="{}">{}</a>"#, href, title)
}

fn section_link(href: &str, title: &str) -> String {
    format!(
        r#"<section class="section"><h2><a href="{}">{}</a></h2></section>"#,
        href, title
    )
}

fn article_link(href: &str, title: &str) -> String {
    format!(r#"<a class="article-list-link" href="{}">{}</a>"#, href, title)
}

fn article_body(text: &str) -> String {
    format!(r#"<div class="article-body">{}</div>"#, text)
}

/// Root → 1 category → 2 sections → (1 article, 0 articles)
async fn mount_basic_site(server: &MockServer) {
    mount_page(server, "/", &category_link("hc/categories/1", "Getting Started")).await;
    mount_page(
        server,
        "/hc/categories/1",
        &format!(
            "{}{}",
            section_link("/hc/sections/1", "Basics"),
            section_link("/hc/sections/2", "Empty Section")
        ),
    )
    .await;
    mount_page(
        server,
        "/hc/sections/1",
        &article_link("/hc/articles/1", "What is a bounty?"),
    )
    .await;
    mount_page(server, "/hc/sections/2", "<p>No articles yet</p>").await;
    mount_page(
        server,
        "/hc/articles/1",
        &article_body("Bounties pay\nmore than\u{a0}quests."),
    )
    .await;
}

#[tokio::test]
async fn test_full_crawl_basic_tree() {
    let server = MockServer::start().await;
    mount_basic_site(&server).await;

    let config = create_test_config(&server, "", "unused.json");
    let crawler = TreeCrawler::new(&config).expect("Failed to create crawler");
    let outcome = crawler.crawl().await.expect("Crawl failed");
    let corpus = outcome.corpus;

    assert_eq!(corpus.category_titles, vec!["Getting Started"]);
    assert_eq!(corpus.sections.len(), 2);
    assert_eq!(corpus.sections[0].url, format!("{}/hc/sections/1", server.uri()));
    assert_eq!(corpus.sections[1].title, "Empty Section");
    assert_eq!(corpus.articles.len(), 1);

    let article = &corpus.articles[0];
    assert_eq!(article.url, format!("{}/hc/articles/1", server.uri()));
    assert_eq!(article.title, "What is a bounty?");
    assert_eq!(article.body, "Bounties pay more thanquests.");

    let report = outcome.report;
    assert_eq!(report.pages_requested, 5);
    assert!(report.failed_fetches.is_empty());
    assert_eq!(report.empty_pages.len(), 1);
    assert_eq!(report.empty_pages[0].level, CrawlLevel::Section);
    assert!(report.finished_at.is_some());
}

#[tokio::test]
async fn test_failed_pages_leave_holes() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        &format!(
            "{}{}",
            category_link("hc/categories/1", "Broken"),
            category_link("hc/categories/2", "Working")
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/hc/categories/1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/hc/categories/2",
        &format!(
            "{}{}",
            section_link("/hc/sections/slow", "Slow"),
            section_link("/hc/sections/2", "Fine")
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/hc/sections/slow"))
        .respond_with(
            html(&article_link("/hc/articles/never", "Never"))
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/hc/sections/2", &article_link("/hc/articles/2", "Fine article")).await;
    mount_page(&server, "/hc/articles/2", &article_body("Still here")).await;

    let config = create_test_config(&server, "request-timeout-ms = 300", "unused.json");
    let outcome = TreeCrawler::new(&config).unwrap().crawl().await.unwrap();

    assert_eq!(outcome.corpus.category_titles, vec!["Broken", "Working"]);
    assert_eq!(outcome.corpus.sections.len(), 2);
    assert_eq!(outcome.corpus.articles.len(), 1);
    assert_eq!(outcome.corpus.articles[0].body, "Still here");

    let failures = &outcome.report.failed_fetches;
    assert_eq!(failures.len(), 2);
    assert_eq!(failures[0].level, CrawlLevel::Category);
    assert!(failures[0].detail.contains("404"));
    assert_eq!(failures[1].level, CrawlLevel::Section);
    assert!(failures[1].url.ends_with("/hc/sections/slow"));
}

async fn mount_site_with_bodiless_article(server: &MockServer) {
    mount_page(server, "/", &category_link("hc/categories/1", "Cat")).await;
    mount_page(server, "/hc/categories/1", &section_link("/hc/sections/1", "Sec")).await;
    mount_page(
        server,
        "/hc/sections/1",
        &format!(
            "{}{}{}",
            article_link("/hc/articles/1", "First"),
            article_link("/hc/articles/2", "No body"),
            article_link("/hc/articles/3", "Third")
        ),
    )
    .await;
    mount_page(server, "/hc/articles/1", &article_body("one")).await;
    mount_page(server, "/hc/articles/2", "<div class=\"promoted\">nothing</div>").await;
    mount_page(server, "/hc/articles/3", &article_body("three")).await;
}

#[tokio::test]
async fn test_missing_body_is_skipped_by_default() {
    let server = MockServer::start().await;
    mount_site_with_bodiless_article(&server).await;

    let config = create_test_config(&server, "", "unused.json");
    let outcome = TreeCrawler::new(&config).unwrap().crawl().await.unwrap();

    let articles = &outcome.corpus.articles;
    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].title, "First");
    assert_eq!(articles[0].body, "one");
    assert_eq!(articles[1].title, "Third");
    assert_eq!(articles[1].body, "three");

    assert_eq!(outcome.report.skipped_articles.len(), 1);
    let skipped = &outcome.report.skipped_articles[0];
    assert_eq!(skipped.level, CrawlLevel::Article);
    assert!(skipped.url.ends_with("/hc/articles/2"));
    assert_eq!(skipped.detail, "no article body");
}

#[tokio::test]
async fn test_missing_body_aborts_when_configured() {
    let server = MockServer::start().await;
    mount_site_with_bodiless_article(&server).await;

    let config = create_test_config(&server, r#"missing-body = "abort""#, "unused.json");
    let result = TreeCrawler::new(&config).unwrap().crawl().await;

    match result {
        Err(HelpHubError::MissingArticleBody { url }) => {
            assert_eq!(url, format!("{}/hc/articles/2", server.uri()));
        }
        other => panic!("Expected MissingArticleBody, got {:?}", other.map(|o| o.corpus)),
    }
}

#[tokio::test]
async fn test_duplicate_article_urls_keep_their_own_titles() {
    let server = MockServer::start().await;

    mount_page(&server, "/", &category_link("hc/categories/1", "Cat")).await;
    mount_page(
        &server,
        "/hc/categories/1",
        &format!(
            "{}{}",
            section_link("/hc/sections/1", "A"),
            section_link("/hc/sections/2", "B")
        ),
    )
    .await;
    mount_page(&server, "/hc/sections/1", &article_link("/hc/articles/shared", "Title in A")).await;
    mount_page(&server, "/hc/sections/2", &article_link("/hc/articles/shared", "Title in B")).await;
    mount_page(&server, "/hc/articles/shared", &article_body("shared body")).await;

    let config = create_test_config(&server, "", "unused.json");
    let corpus = TreeCrawler::new(&config).unwrap().crawl().await.unwrap().corpus;

    assert_eq!(corpus.articles.len(), 2);
    assert_eq!(corpus.articles[0].title, "Title in A");
    assert_eq!(corpus.articles[1].title, "Title in B");
    assert_eq!(corpus.articles[0].url, corpus.articles[1].url);

    let first = corpus
        .article_by_url(&corpus.articles[1].url)
        .expect("article should be found");
    assert_eq!(first.title, "Title in A");
}

#[tokio::test]
async fn test_concurrent_fetches_preserve_order() {
    let server = MockServer::start().await;

    let sections: String = (1..=4)
        .map(|i| section_link(&format!("/hc/sections/{}", i), &format!("Section {}", i)))
        .collect();
    mount_page(&server, "/", &category_link("hc/categories/1", "Cat")).await;
    mount_page(&server, "/hc/categories/1", &sections).await;

    for i in 1..=4u64 {
        // Earlier sections answer slower so completions arrive out of order
        Mock::given(method("GET"))
            .and(path(format!("/hc/sections/{}", i)))
            .respond_with(
                html(&article_link(&format!("/hc/articles/{}", i), &format!("Article {}", i)))
                    .set_delay(Duration::from_millis(200 - i * 40)),
            )
            .mount(&server)
            .await;
        mount_page(
            &server,
            &format!("/hc/articles/{}", i),
            &article_body(&format!("body {}", i)),
        )
        .await;
    }

    let sequential = create_test_config(&server, "max-concurrent-fetches = 1", "unused.json");
    let concurrent = create_test_config(&server, "max-concurrent-fetches = 4", "unused.json");

    let expected = TreeCrawler::new(&sequential).unwrap().crawl().await.unwrap().corpus;
    let actual = TreeCrawler::new(&concurrent).unwrap().crawl().await.unwrap().corpus;

    assert_eq!(actual, expected);
    let titles: Vec<&str> = actual.articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Article 1", "Article 2", "Article 3", "Article 4"]);
}

#[tokio::test]
async fn test_ensure_corpus_crawls_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&category_link("hc/categories/1", "Only Once")))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/hc/categories/1", &section_link("/hc/sections/1", "Sec")).await;
    mount_page(&server, "/hc/sections/1", &article_link("/hc/articles/1", "Art")).await;
    mount_page(&server, "/hc/articles/1", &article_body("Ünïcode body")).await;

    let dir = TempDir::new().unwrap();
    let corpus_path = dir.path().join("data").join("corpus.json");
    let config = create_test_config(&server, "", &corpus_path.display().to_string());

    let store = JsonCorpusStore::new(&config.output.corpus_path);
    let crawler = TreeCrawler::new(&config).unwrap();

    let first = ensure_corpus(&crawler, &store, false).await.unwrap();
    assert!(matches!(first, CorpusSource::Crawled(_)));
    assert!(store.exists());

    let second = ensure_corpus(&crawler, &store, false).await.unwrap();
    assert!(matches!(second, CorpusSource::Loaded(_)));
    assert_eq!(second.corpus(), first.corpus());
    assert_eq!(second.corpus().articles[0].body, "Ünïcode body");

    let saved = std::fs::read_to_string(&corpus_path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(json["main_urls_titles"][0], "Only Once");
    assert_eq!(json["article_link_title"][0], "Art");
}

#[tokio::test]
async fn test_ensure_corpus_fresh_recrawls() {
    let server = MockServer::start().await;
    mount_basic_site(&server).await;

    let dir = TempDir::new().unwrap();
    let corpus_path = dir.path().join("corpus.json");
    let config = create_test_config(&server, "", &corpus_path.display().to_string());

    let store = JsonCorpusStore::new(&corpus_path);
    let crawler = TreeCrawler::new(&config).unwrap();

    ensure_corpus(&crawler, &store, false).await.unwrap();
    let again = ensure_corpus(&crawler, &store, true).await.unwrap();

    assert!(matches!(again, CorpusSource::Crawled(_)));
    assert_eq!(store.load().unwrap().articles.len(), 1);
}

#[tokio::test]
async fn test_together_client_against_mock_api() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "object": "list",
            "data": [{ "object": "embedding", "index": 0, "embedding": [0.5, 0.25, 0.0] }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "Bounties pay more.\nSOURCE: https://help.example.com/hc/articles/1"
                }
            }]
        })))
        .mount(&server)
        .await;

    let config = create_test_config(&server, "", "unused.json");
    let client = TogetherClient::with_api_key(&config.rag, "test-key");

    let vector = client.embed("what is a bounty").await.unwrap();
    assert_eq!(vector, vec![0.5, 0.25, 0.0]);

    let completion = client.complete("prompt").await.unwrap();
    assert!(completion.starts_with("Bounties pay more."));

    let qa = RetrievalQa::new(&config.rag, client.clone(), InMemoryIndex::new(), client);
    let records = vec![helphub::CleanedRecord {
        title: "what is bounty".to_string(),
        page_content: "bounties pay more".to_string(),
        urls: "https://help.example.com/hc/articles/1".to_string(),
    }];
    assert_eq!(qa.prepare(&records).await.unwrap(), 1);

    let answer = qa.answer("what is a bounty?").await;
    assert_eq!(answer.answer, "Bounties pay more.");
    assert_eq!(answer.sources, vec!["https://help.example.com/hc/articles/1"]);
}

#[tokio::test]
async fn test_qa_falls_back_when_provider_fails() {
    let server = MockServer::start().await;
    mount_basic_site(&server).await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let config = create_test_config(&server, "", "unused.json");
    let corpus = TreeCrawler::new(&config).unwrap().crawl().await.unwrap().corpus;
    let records = build_records(&corpus);
    assert_eq!(records.len(), 1);

    let client = TogetherClient::with_api_key(&config.rag, "test-key");
    let qa = RetrievalQa::new(&config.rag, client.clone(), InMemoryIndex::new(), client);

    assert!(qa.prepare(&records).await.is_err());

    let answer = qa.answer("what is a bounty?").await;
    assert_eq!(answer.answer, FALLBACK_ANSWER);
    assert!(answer.sources.is_empty());

    let answer = qa.prepare_and_answer(&records, "what is a bounty?").await;
    assert_eq!(answer.answer, FALLBACK_ANSWER);
}

#[tokio::test]
async fn test_ask_falls_back_when_provider_refuses_connections() {
    let server = MockServer::start().await;
    let mut config = create_test_config(&server, "", "unused.json");
    // Port 9 (discard) on localhost is expected to refuse connections
    config.rag.api_base_url = "http://127.0.0.1:9/v1".to_string();

    let records = vec![helphub::CleanedRecord {
        title: "what is bounty".to_string(),
        page_content: "bounties pay more".to_string(),
        urls: "https://help.example.com/hc/articles/1".to_string(),
    }];

    let client = TogetherClient::with_api_key(&config.rag, "test-key");
    let qa = RetrievalQa::new(&config.rag, client.clone(), InMemoryIndex::new(), client);

    let answer = qa.prepare_and_answer(&records, "what is a bounty?").await;
    assert_eq!(answer.answer, FALLBACK_ANSWER);
    assert!(answer.sources.is_empty());

    config.rag.api_key_env = "HELPHUB_INTEGRATION_KEY_THAT_IS_NOT_SET".to_string();
    let answer = ask(&config.rag, &records, "what is a bounty?").await;
    assert_eq!(answer.answer, FALLBACK_ANSWER);
}

#[tokio::test]
async fn test_failed_body_fetch_is_reported_as_skipped() {
    let server = MockServer::start().await;

    mount_page(&server, "/", &category_link("hc/categories/1", "Cat")).await;
    mount_page(&server, "/hc/categories/1", &section_link("/hc/sections/1", "Sec")).await;
    mount_page(&server, "/hc/sections/1", &article_link("/hc/articles/gone", "Gone")).await;
    Mock::given(method("GET"))
        .and(path("/hc/articles/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = create_test_config(&server, "", "unused.json");
    let outcome = TreeCrawler::new(&config).unwrap().crawl().await.unwrap();

    assert!(outcome.corpus.articles.is_empty());
    assert_eq!(outcome.report.failed_fetches.len(), 1);
    assert_eq!(outcome.report.skipped_articles.len(), 1);
    assert_eq!(
        outcome.report.skipped_articles[0].detail,
        "no article body (fetch failed)"
    );
}
