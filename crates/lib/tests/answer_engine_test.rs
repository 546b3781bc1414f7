//! # Answer Engine Tests
//!
//! Integration tests for grounded question answering: the retrieval
//! context, citation ordering, and the fixed fallback that must never
//! spend a model call.

mod common;

use anyhow::Result;
use common::setup_tracing;
use observatory::answer::AnswerEngine;
use observatory::index::{EmbeddingConfig, VectorIndex};
use observatory::prompts::FALLBACK_ANSWER;
use observatory::types::{Category, GeneratedArticle, RawNewsItem};
use observatory_test_utils::{MockAiProvider, TestSetup};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn generated(title: &str, category: Category) -> GeneratedArticle {
    GeneratedArticle {
        title: title.to_string(),
        title_en: title.to_string(),
        summary: "Sommario.".to_string(),
        summary_en: "Summary.".to_string(),
        content: format!("Contenuto di {title}."),
        content_en: format!("Body of {title}."),
        category,
    }
}

fn raw(link: &str) -> RawNewsItem {
    RawNewsItem {
        title: "raw".to_string(),
        raw_text: "raw".to_string(),
        link: link.to_string(),
        image_url: None,
        source_name: "Mock Feed".to_string(),
        credibility: 3,
    }
}

async fn mount_embedding(server: &MockServer, input_fragment: &str, vector: &[f32]) {
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(body_string_contains(input_fragment))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"embedding": vector}]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_empty_archive_returns_fallback_without_model_call() -> Result<()> {
    // --- Arrange ---
    setup_tracing();
    let setup = TestSetup::new().await?;
    // No endpoint is reachable; an empty index must never need one.
    let index = VectorIndex::new(
        &setup.db,
        EmbeddingConfig {
            api_url: "http://127.0.0.1:1/v1/embeddings".to_string(),
            model: "test-embedder".to_string(),
            api_key: None,
        },
    );
    let provider = MockAiProvider::new();
    let engine = AnswerEngine::new(Box::new(provider.clone()), index, setup.store.clone());

    // --- Act ---
    let result = engine.answer("Cosa è successo questa settimana?", 4).await?;

    // --- Assert ---
    assert_eq!(result.answer, FALLBACK_ANSWER);
    assert!(result.sources.is_empty());
    assert_eq!(result.question, "Cosa è successo questa settimana?");
    assert!(
        provider.get_calls().is_empty(),
        "the fallback must not spend a model call"
    );
    Ok(())
}

#[tokio::test]
async fn test_grounded_answer_cites_retrieved_articles_in_order() -> Result<()> {
    // --- Arrange ---
    setup_tracing();
    let setup = TestSetup::new().await?;
    let server = MockServer::start().await;

    let modelli = setup
        .store
        .create_article(
            &generated("Contesto esteso nei modelli", Category::Llm),
            &raw("https://mock.local/modelli"),
        )
        .await?;
    let mercato = setup
        .store
        .create_article(
            &generated("Nuovi investimenti nel settore", Category::Market),
            &raw("https://mock.local/mercato"),
        )
        .await?;

    mount_embedding(&server, "Contesto esteso", &[1.0, 0.0, 0.0, 0.0]).await;
    mount_embedding(&server, "Nuovi investimenti", &[0.0, 1.0, 0.0, 0.0]).await;
    mount_embedding(&server, "finestra di contesto", &[0.9, 0.1, 0.0, 0.0]).await;

    let index = VectorIndex::new(
        &setup.db,
        EmbeddingConfig {
            api_url: format!("{}/v1/embeddings", server.uri()),
            model: "test-embedder".to_string(),
            api_key: None,
        },
    );
    index.rebuild(&setup.store.list_all_articles().await?).await?;

    let provider = MockAiProvider::new();
    provider.add_response(
        "assistente",
        "I modelli recenti estendono la finestra di contesto [1]. Fonti interne: [1], [2]",
    );
    let engine = AnswerEngine::new(Box::new(provider.clone()), index, setup.store.clone());

    // --- Act ---
    let result = engine
        .answer("Come cambia la finestra di contesto?", 2)
        .await?;

    // --- Assert ---
    assert!(result.answer.contains("Fonti interne:"));
    assert_eq!(result.sources.len(), 2);
    // Citation order mirrors retrieval order, most relevant first.
    assert_eq!(result.sources[0].id, modelli.id);
    assert_eq!(result.sources[0].category, "Modelli LLM");
    assert_eq!(result.sources[1].id, mercato.id);
    assert_eq!(result.sources[1].category, "Mercato e Aziende");

    let calls = provider.get_calls();
    assert_eq!(calls.len(), 1);
    let (_, user_prompt) = &calls[0];
    assert!(user_prompt.contains("[1] Titolo: Contesto esteso nei modelli"));
    assert!(user_prompt.contains("[2] Titolo: Nuovi investimenti nel settore"));
    assert!(user_prompt.contains("# Domanda"));
    assert!(user_prompt.contains("Come cambia la finestra di contesto?"));
    Ok(())
}
