//! # Vector Index Manager
//!
//! Maintains the embedding index over all persisted articles. The index is
//! a derived, rebuildable cache: `rebuild` replaces the whole snapshot in
//! one transaction, so concurrent readers observe the old or the new
//! index, never a partially-cleared one.

use crate::errors::PromptError;
use crate::providers::ai::generate_embedding;
use crate::types::StoredArticle;
use thiserror::Error;
use turso::{params, Database, Value as TursoValue};
use tracing::{debug, info};

/// Custom error types for index operations.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Database error: {0}")]
    Database(#[from] turso::Error),
    #[error("Embedding generation failed: {0}")]
    Embedding(#[from] PromptError),
}

/// Where and how to reach the embeddings endpoint.
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub api_url: String,
    pub model: String,
    pub api_key: Option<String>,
}

/// A handle over the `article_embeddings` snapshot table.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    db: Database,
    config: EmbeddingConfig,
}

impl VectorIndex {
    pub fn new(db: &Database, config: EmbeddingConfig) -> Self {
        Self {
            db: db.clone(),
            config,
        }
    }

    /// Rebuilds the full snapshot from the given articles.
    ///
    /// All embeddings are generated before the transaction starts, so a
    /// transport failure leaves the previous snapshot untouched. The swap
    /// itself is delete-all plus insert in a single transaction.
    pub async fn rebuild(&self, articles: &[StoredArticle]) -> Result<(), IndexError> {
        info!(count = articles.len(), "Rebuilding vector index");

        let mut entries = Vec::with_capacity(articles.len());
        for article in articles {
            let document = format!("{}\n\n{}", article.title, article.content);
            let vector = generate_embedding(
                &self.config.api_url,
                &self.config.model,
                &document,
                self.config.api_key.as_deref(),
            )
            .await?;
            debug!(article_id = article.id, dims = vector.len(), "Embedded article");
            entries.push((article, document, vector));
        }

        let conn = self.db.connect()?;
        conn.execute("BEGIN TRANSACTION", ()).await?;

        let swap = async {
            conn.execute("DELETE FROM article_embeddings", ()).await?;
            let mut stmt = conn
                .prepare(
                    "INSERT INTO article_embeddings
                     (article_id, embedding, document, slug, title, category)
                     VALUES (?, ?, ?, ?, ?, ?)",
                )
                .await?;
            for (article, document, vector) in &entries {
                let vector_bytes: &[u8] = unsafe {
                    std::slice::from_raw_parts(vector.as_ptr() as *const u8, vector.len() * 4)
                };
                stmt.execute(params![
                    article.id,
                    vector_bytes,
                    document.clone(),
                    article.slug.clone(),
                    article.title.clone(),
                    article.category_label.clone()
                ])
                .await?;
            }
            Ok::<(), turso::Error>(())
        };

        match swap.await {
            Ok(()) => {
                conn.execute("COMMIT", ()).await?;
                info!(count = entries.len(), "Vector index rebuilt");
                Ok(())
            }
            Err(e) => {
                conn.execute("ROLLBACK", ()).await?;
                Err(IndexError::Database(e))
            }
        }
    }

    /// Embeds the question and returns article ids in descending relevance
    /// order. An empty index yields an empty result, never an error.
    pub async fn query(&self, question: &str, top_k: usize) -> Result<Vec<i64>, IndexError> {
        let conn = self.db.connect()?;

        let mut rows = conn
            .query("SELECT COUNT(*) FROM article_embeddings", ())
            .await?;
        let count = match rows.next().await?.map(|row| row.get_value(0)) {
            Some(Ok(TursoValue::Integer(n))) => n,
            _ => 0,
        };
        if count == 0 {
            return Ok(Vec::new());
        }

        let vector = generate_embedding(
            &self.config.api_url,
            &self.config.model,
            question,
            self.config.api_key.as_deref(),
        )
        .await?;

        let vector_str = format!(
            "vector('[{}]')",
            vector
                .iter()
                .map(|f| f.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        let sql = format!(
            "SELECT article_id,
                    (1.0 - (vector_distance_cos(embedding, {vector_str}) / 2.0)) AS similarity
             FROM article_embeddings
             ORDER BY similarity DESC
             LIMIT {top_k}"
        );

        let mut rows = conn.query(&sql, ()).await?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next().await? {
            if let TursoValue::Integer(id) = row.get_value(0)? {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}
