//! # Ingestion Cycle Tests
//!
//! Full-pipeline tests: feed to store to index in one cycle, idempotence
//! across repeated cycles, and failure accounting when synthesis breaks.

mod common;

use anyhow::Result;
use chrono::Utc;
use common::setup_tracing;
use observatory::feed::{FeedFetcher, FetchOptions};
use observatory::index::{EmbeddingConfig, VectorIndex};
use observatory::pipeline::{CycleReport, IngestPipeline};
use observatory::sources::FeedSource;
use observatory::synthesis::ArticleSynthesizer;
use observatory_test_utils::{MockAiProvider, TestSetup};
use serde_json::json;
use turso::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn feed_xml(server_uri: &str) -> String {
    let fresh = Utc::now().to_rfc2822();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
        <rss version=\"2.0\">\
            <channel>\
                <title>Mock Feed</title>\
                <link>http://mock.local</link>\
                <description>A feed for testing</description>\
                <item>\
                    <title>New language model beats benchmarks</title>\
                    <link>{server_uri}/articles/benchmarks</link>\
                    <description>The latest language model tops every benchmark.</description>\
                    <pubDate>{fresh}</pubDate>\
                </item>\
                <item>\
                    <title>Open weights for a new transformer</title>\
                    <link>{server_uri}/articles/weights</link>\
                    <description>A new transformer was released with open weights.</description>\
                    <pubDate>{fresh}</pubDate>\
                </item>\
            </channel>\
        </rss>"
    )
}

async fn start_mock_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(feed_xml(&server.uri())))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"embedding": [0.1, 0.2, 0.3]}]
        })))
        .mount(&server)
        .await;
    // Article pages have no scrapeable image.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    server
}

async fn build_pipeline(
    setup: &TestSetup,
    server: &MockServer,
    provider: MockAiProvider,
) -> Result<IngestPipeline> {
    let fetcher = FeedFetcher::new(FetchOptions {
        lookback_days: 7,
        per_feed_limit: 5,
    })?;
    let index = VectorIndex::new(
        &setup.db,
        EmbeddingConfig {
            api_url: format!("{}/v1/embeddings", server.uri()),
            model: "test-embedder".to_string(),
            api_key: None,
        },
    );
    let sources = vec![FeedSource::new(
        &format!("{}/feed.xml", server.uri()),
        "Mock Feed",
        5,
    )];
    Ok(IngestPipeline::new(
        fetcher,
        ArticleSynthesizer::new(Box::new(provider)),
        setup.store.clone(),
        index,
        sources,
    ))
}

async fn embeddings_count(setup: &TestSetup) -> Result<i64> {
    let conn = setup.db.connect()?;
    let mut rows = conn
        .query("SELECT COUNT(*) FROM article_embeddings", ())
        .await?;
    let row = rows.next().await?.expect("count row");
    match row.get_value(0)? {
        Value::Integer(count) => Ok(count),
        other => panic!("Expected integer count, got {other:?}"),
    }
}

#[tokio::test]
async fn test_cycle_persists_indexes_and_stays_idempotent() -> Result<()> {
    // --- Arrange ---
    setup_tracing();
    let setup = TestSetup::new().await?;
    let server = start_mock_server().await;

    let provider = MockAiProvider::new();
    provider.add_response(
        "redattore",
        r#"{
            "title": "Articolo sintetizzato",
            "title_en": "Synthesized article",
            "summary": "Sommario.",
            "summary_en": "Summary.",
            "content": "Corpo completo dell'articolo.",
            "content_en": "Full article body.",
            "category": "Modelli LLM"
        }"#,
    );
    let pipeline = build_pipeline(&setup, &server, provider).await?;

    // --- Act ---
    let first = pipeline.run_cycle().await;

    // --- Assert ---
    assert_eq!(
        first,
        CycleReport {
            fetched: 2,
            skipped_duplicates: 0,
            synthesized: 2,
            persisted: 2,
            failures: 0,
            index_rebuilt: true,
        }
    );

    let articles = setup.store.list_all_articles().await?;
    assert_eq!(articles.len(), 2);
    let mut slugs: Vec<&str> = articles.iter().map(|a| a.slug.as_str()).collect();
    slugs.sort();
    // Identical titles must still yield distinct slugs.
    assert_eq!(slugs, vec!["articolo-sintetizzato", "articolo-sintetizzato-2"]);
    assert!(articles.iter().all(|a| a.category_slug == "modelli-llm"));
    assert_eq!(embeddings_count(&setup).await?, 2);

    // --- Act again: the same feed content must not duplicate anything ---
    let second = pipeline.run_cycle().await;

    // --- Assert ---
    assert_eq!(
        second,
        CycleReport {
            fetched: 2,
            skipped_duplicates: 2,
            synthesized: 0,
            persisted: 0,
            failures: 0,
            index_rebuilt: true,
        }
    );
    assert_eq!(setup.store.list_all_articles().await?.len(), 2);
    assert_eq!(embeddings_count(&setup).await?, 2);
    Ok(())
}

#[tokio::test]
async fn test_cycle_counts_synthesis_failures_and_continues() -> Result<()> {
    // --- Arrange ---
    setup_tracing();
    let setup = TestSetup::new().await?;
    let server = start_mock_server().await;

    let provider = MockAiProvider::new();
    provider.add_response("redattore", "niente JSON in questa risposta");
    let pipeline = build_pipeline(&setup, &server, provider).await?;

    // --- Act ---
    let report = pipeline.run_cycle().await;

    // --- Assert ---
    assert_eq!(
        report,
        CycleReport {
            fetched: 2,
            skipped_duplicates: 0,
            synthesized: 0,
            persisted: 0,
            failures: 2,
            index_rebuilt: true,
        }
    );
    assert!(setup.store.list_all_articles().await?.is_empty());
    assert_eq!(embeddings_count(&setup).await?, 0);
    Ok(())
}
