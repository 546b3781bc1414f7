//! # Canonical Article Store
//!
//! The persistence layer over a local SQLite database: schema management,
//! the dedup gate, category resolution, and the single insert path that
//! turns pipeline output into durable state.

pub mod sql;

use crate::types::{Category, GeneratedArticle, RawNewsItem, StoredArticle};
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info};
use turso::{params, Connection, Database, Value};

/// Custom error types for store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] turso::Error),
    #[error("Unexpected row shape: {0}")]
    Decode(String),
}

/// A handle over the canonical store.
///
/// Cloning shares the same underlying database; connections are acquired
/// per operation.
#[derive(Debug, Clone)]
pub struct ArticleStore {
    db: Database,
}

impl ArticleStore {
    pub fn new(db: &Database) -> Self {
        Self { db: db.clone() }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Ensures all required tables and indexes exist. Idempotent, safe to
    /// call on every startup.
    pub async fn initialize_schema(&self) -> Result<(), StoreError> {
        let conn = self.db.connect()?;
        for statement in sql::ALL_TABLE_CREATION_SQL {
            conn.execute(statement, ()).await?;
        }
        Ok(())
    }

    /// The dedup gate: true when a canonical article already carries this
    /// source link.
    pub async fn article_exists_by_source(&self, link: &str) -> Result<bool, StoreError> {
        let conn = self.db.connect()?;
        let mut rows = conn
            .query(
                "SELECT 1 FROM articles WHERE source_url = ? LIMIT 1",
                params![link],
            )
            .await?;
        Ok(rows.next().await?.is_some())
    }

    /// Persists one generated article, resolving its category and deriving
    /// a unique slug. The sole ingestion write path into the store.
    pub async fn create_article(
        &self,
        article: &GeneratedArticle,
        item: &RawNewsItem,
    ) -> Result<StoredArticle, StoreError> {
        let conn = self.db.connect()?;

        let category_id = self.resolve_category(&conn, article.category).await?;
        let slug = self.unique_slug(&conn, &slugify(&article.title)).await?;
        let now = Utc::now().to_rfc3339();

        let mut stmt = conn
            .prepare(
                "INSERT INTO articles (
                    title, slug, summary, content, title_en, summary_en, content_en,
                    category_id, source_url, source_name, credibility, image_url,
                    created_at, updated_at
                 ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                 RETURNING id",
            )
            .await?;

        let mut rows = stmt
            .query(params![
                article.title.clone(),
                slug.clone(),
                article.summary.clone(),
                article.content.clone(),
                article.title_en.clone(),
                article.summary_en.clone(),
                article.content_en.clone(),
                category_id,
                item.link.clone(),
                item.source_name.clone(),
                item.credibility as i64,
                item.image_url.clone(),
                now.clone(),
                now.clone()
            ])
            .await?;

        let row = rows
            .next()
            .await?
            .ok_or_else(|| StoreError::Decode("INSERT returned no id".to_string()))?;
        let id = match row.get_value(0)? {
            Value::Integer(id) => id,
            other => {
                return Err(StoreError::Decode(format!(
                    "expected integer id, got {other:?}"
                )))
            }
        };

        info!(id, slug = %slug, title = %article.title, "Article persisted");

        Ok(StoredArticle {
            id,
            title: article.title.clone(),
            slug,
            summary: article.summary.clone(),
            content: article.content.clone(),
            title_en: article.title_en.clone(),
            summary_en: article.summary_en.clone(),
            content_en: article.content_en.clone(),
            category_label: article.category.label().to_string(),
            category_slug: article.category.slug().to_string(),
            source_url: item.link.clone(),
            source_name: item.source_name.clone(),
            credibility: item.credibility,
            image_url: item.image_url.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Returns every canonical article, newest first.
    pub async fn list_all_articles(&self) -> Result<Vec<StoredArticle>, StoreError> {
        let conn = self.db.connect()?;
        let mut rows = conn
            .query(
                "SELECT a.id, a.title, a.slug, a.summary, a.content,
                        a.title_en, a.summary_en, a.content_en,
                        c.name, c.slug,
                        a.source_url, a.source_name, a.credibility, a.image_url,
                        a.created_at, a.updated_at
                 FROM articles a
                 JOIN categories c ON c.id = a.category_id
                 ORDER BY a.id DESC",
                (),
            )
            .await?;

        let mut articles = Vec::new();
        while let Some(row) = rows.next().await? {
            articles.push(decode_article(&row)?);
        }
        Ok(articles)
    }

    /// Fetches articles by id, preserving the order of `ids`.
    pub async fn articles_by_ids(&self, ids: &[i64]) -> Result<Vec<StoredArticle>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.db.connect()?;
        let placeholders = ids.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
        let sql = format!(
            "SELECT a.id, a.title, a.slug, a.summary, a.content,
                    a.title_en, a.summary_en, a.content_en,
                    c.name, c.slug,
                    a.source_url, a.source_name, a.credibility, a.image_url,
                    a.created_at, a.updated_at
             FROM articles a
             JOIN categories c ON c.id = a.category_id
             WHERE a.id IN ({placeholders})"
        );
        let query_params: Vec<Value> = ids.iter().map(|id| Value::Integer(*id)).collect();

        let mut rows = conn.query(&sql, query_params).await?;
        let mut fetched = Vec::new();
        while let Some(row) = rows.next().await? {
            fetched.push(decode_article(&row)?);
        }

        // SQL does not preserve IN-list order; restore retrieval order here.
        let mut ordered = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(pos) = fetched.iter().position(|a: &StoredArticle| a.id == *id) {
                ordered.push(fetched.remove(pos));
            }
        }
        Ok(ordered)
    }

    /// Terminology overrides for the synthesis system prompt.
    pub async fn glossary_terms(&self) -> Result<Vec<(String, String)>, StoreError> {
        let conn = self.db.connect()?;
        let mut rows = conn
            .query(
                "SELECT banned, preferred FROM glossary_terms ORDER BY id",
                (),
            )
            .await?;
        let mut terms = Vec::new();
        while let Some(row) = rows.next().await? {
            terms.push((text_at(&row, 0)?, text_at(&row, 1)?));
        }
        Ok(terms)
    }

    /// Adds one terminology override; replaces an existing banned term.
    pub async fn add_glossary_term(
        &self,
        banned: &str,
        preferred: &str,
    ) -> Result<(), StoreError> {
        let conn = self.db.connect()?;
        conn.execute(
            "INSERT INTO glossary_terms (banned, preferred) VALUES (?, ?)
             ON CONFLICT(banned) DO UPDATE SET preferred = excluded.preferred",
            params![banned, preferred],
        )
        .await?;
        Ok(())
    }

    /// Resolves the category row id, creating the row with its default
    /// icon and description on first use.
    async fn resolve_category(
        &self,
        conn: &Connection,
        category: Category,
    ) -> Result<i64, StoreError> {
        let mut rows = conn
            .query(
                "SELECT id FROM categories WHERE slug = ?",
                params![category.slug()],
            )
            .await?;
        if let Some(row) = rows.next().await? {
            return int_at(&row, 0);
        }

        debug!(category = %category.label(), "Creating category row");
        let mut stmt = conn
            .prepare(
                "INSERT INTO categories (name, slug, icon, description)
                 VALUES (?, ?, ?, ?) RETURNING id",
            )
            .await?;
        let mut rows = stmt
            .query(params![
                category.label(),
                category.slug(),
                category.icon(),
                category.description()
            ])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| StoreError::Decode("category INSERT returned no id".to_string()))?;
        int_at(&row, 0)
    }

    /// Probes for a free slug: the base, then `base-2`, `base-3`, and so on.
    async fn unique_slug(&self, conn: &Connection, base: &str) -> Result<String, StoreError> {
        let mut candidate = base.to_string();
        let mut counter = 2;
        loop {
            let mut rows = conn
                .query(
                    "SELECT 1 FROM articles WHERE slug = ? LIMIT 1",
                    params![candidate.clone()],
                )
                .await?;
            if rows.next().await?.is_none() {
                return Ok(candidate);
            }
            candidate = format!("{base}-{counter}");
            counter += 1;
        }
    }
}

/// Derives a URL-safe slug from a title.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_dash = true;
    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    let trimmed = slug.trim_matches('-').to_string();
    if trimmed.is_empty() {
        "articolo".to_string()
    } else {
        trimmed
    }
}

fn decode_article(row: &turso::Row) -> Result<StoredArticle, StoreError> {
    Ok(StoredArticle {
        id: int_at(row, 0)?,
        title: text_at(row, 1)?,
        slug: text_at(row, 2)?,
        summary: text_at(row, 3)?,
        content: text_at(row, 4)?,
        title_en: text_at(row, 5)?,
        summary_en: text_at(row, 6)?,
        content_en: text_at(row, 7)?,
        category_label: text_at(row, 8)?,
        category_slug: text_at(row, 9)?,
        source_url: text_at(row, 10)?,
        source_name: text_at(row, 11)?,
        credibility: int_at(row, 12)? as u8,
        image_url: optional_text_at(row, 13)?,
        created_at: text_at(row, 14)?,
        updated_at: text_at(row, 15)?,
    })
}

fn text_at(row: &turso::Row, idx: usize) -> Result<String, StoreError> {
    match row.get_value(idx)? {
        Value::Text(s) => Ok(s),
        Value::Null => Ok(String::new()),
        other => Err(StoreError::Decode(format!(
            "expected text at column {idx}, got {other:?}"
        ))),
    }
}

fn optional_text_at(row: &turso::Row, idx: usize) -> Result<Option<String>, StoreError> {
    match row.get_value(idx)? {
        Value::Text(s) if !s.is_empty() => Ok(Some(s)),
        Value::Text(_) | Value::Null => Ok(None),
        other => Err(StoreError::Decode(format!(
            "expected text at column {idx}, got {other:?}"
        ))),
    }
}

fn int_at(row: &turso::Row, idx: usize) -> Result<i64, StoreError> {
    match row.get_value(idx)? {
        Value::Integer(i) => Ok(i),
        other => Err(StoreError::Decode(format!(
            "expected integer at column {idx}, got {other:?}"
        ))),
    }
}
