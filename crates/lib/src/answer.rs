//! # Answer Synthesizer
//!
//! Retrieves the most relevant archived articles for a question and asks
//! the model for an answer grounded strictly in that context. With nothing
//! to ground on, a fixed fallback is returned and the model is never
//! called.

use crate::errors::PromptError;
use crate::index::{IndexError, VectorIndex};
use crate::prompts::{ANSWER_SYSTEM_PROMPT, ANSWER_USER_PROMPT, FALLBACK_ANSWER};
use crate::providers::ai::AiProvider;
use crate::store::{ArticleStore, StoreError};
use crate::types::{AnswerResult, SourceRef, StoredArticle};
use thiserror::Error;
use tracing::{debug, info};

/// Default number of articles retrieved as context.
pub const DEFAULT_TOP_K: usize = 4;

/// Custom error types for answer synthesis.
#[derive(Error, Debug)]
pub enum AnswerError {
    #[error("AI provider failed: {0}")]
    Llm(#[from] PromptError),
    #[error("Index query failed: {0}")]
    Index(#[from] IndexError),
    #[error("Store read failed: {0}")]
    Store(#[from] StoreError),
}

/// Answers questions over the accumulated archive.
#[derive(Debug, Clone)]
pub struct AnswerEngine {
    provider: Box<dyn AiProvider>,
    index: VectorIndex,
    store: ArticleStore,
}

impl AnswerEngine {
    pub fn new(provider: Box<dyn AiProvider>, index: VectorIndex, store: ArticleStore) -> Self {
        Self {
            provider,
            index,
            store,
        }
    }

    /// Produces a grounded answer with its ordered citations.
    pub async fn answer(&self, question: &str, top_k: usize) -> Result<AnswerResult, AnswerError> {
        let ids = self.index.query(question, top_k).await?;
        let articles = self.store.articles_by_ids(&ids).await?;

        if articles.is_empty() {
            info!(question = %question, "No relevant articles; returning fallback");
            return Ok(AnswerResult {
                question: question.to_string(),
                answer: FALLBACK_ANSWER.to_string(),
                sources: Vec::new(),
            });
        }

        let context = build_context(&articles);
        let user_prompt = ANSWER_USER_PROMPT
            .replace("{context}", &context)
            .replace("{question}", question);

        debug!(retrieved = articles.len(), "Asking model for grounded answer");
        let answer = self
            .provider
            .generate(ANSWER_SYSTEM_PROMPT, &user_prompt)
            .await?;

        let sources = articles
            .iter()
            .map(|a| SourceRef {
                id: a.id,
                title: a.title.clone(),
                slug: a.slug.clone(),
                category: a.category_label.clone(),
            })
            .collect();

        Ok(AnswerResult {
            question: question.to_string(),
            answer,
            sources,
        })
    }
}

/// Enumerates the retrieved articles with ordinal citation markers.
fn build_context(articles: &[StoredArticle]) -> String {
    let mut blocks = Vec::with_capacity(articles.len());
    for (i, article) in articles.iter().enumerate() {
        blocks.push(format!(
            "[{n}] Titolo: {title}\nCategoria: {category}\nContenuto:\n{content}",
            n = i + 1,
            title = article.title,
            category = article.category_label,
            content = article.content,
        ));
    }
    blocks.join("\n\n---\n\n")
}
