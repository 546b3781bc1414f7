//! # Ingestion Pipeline
//!
//! One full cycle: fetch, dedup, synthesize, persist, then rebuild the
//! vector index. Strictly sequential per item. The guiding policy is skip
//! and continue; no per-item failure ever aborts the cycle, and a failed
//! index rebuild leaves the previous snapshot in place.

use crate::feed::FeedFetcher;
use crate::index::VectorIndex;
use crate::sources::FeedSource;
use crate::store::ArticleStore;
use crate::synthesis::ArticleSynthesizer;
use tracing::{error, info, warn};

/// What happened during one ingestion cycle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub fetched: usize,
    pub skipped_duplicates: usize,
    pub synthesized: usize,
    pub persisted: usize,
    pub failures: usize,
    pub index_rebuilt: bool,
}

/// Wires the pipeline stages together for scheduled or on-demand runs.
pub struct IngestPipeline {
    fetcher: FeedFetcher,
    synthesizer: ArticleSynthesizer,
    store: ArticleStore,
    index: VectorIndex,
    sources: Vec<FeedSource>,
}

impl IngestPipeline {
    pub fn new(
        fetcher: FeedFetcher,
        synthesizer: ArticleSynthesizer,
        store: ArticleStore,
        index: VectorIndex,
        sources: Vec<FeedSource>,
    ) -> Self {
        Self {
            fetcher,
            synthesizer,
            store,
            index,
            sources,
        }
    }

    /// Runs one full ingestion cycle and reports the outcome.
    pub async fn run_cycle(&self) -> CycleReport {
        let mut report = CycleReport::default();

        let items = self.fetcher.fetch_all(&self.sources).await;
        report.fetched = items.len();
        info!(fetched = report.fetched, "Fetch stage complete");

        let glossary = match self.store.glossary_terms().await {
            Ok(terms) => terms,
            Err(e) => {
                warn!(error = %e, "Glossary unavailable; proceeding with built-ins only");
                Vec::new()
            }
        };

        for item in &items {
            match self.store.article_exists_by_source(&item.link).await {
                Ok(true) => {
                    report.skipped_duplicates += 1;
                    continue;
                }
                Ok(false) => {}
                Err(e) => {
                    warn!(link = %item.link, error = %e, "Dedup check failed; skipping item");
                    report.failures += 1;
                    continue;
                }
            }

            let article = match self.synthesizer.synthesize(item, &glossary).await {
                Ok(article) => article,
                Err(e) => {
                    warn!(title = %item.title, error = %e, "Synthesis failed; skipping item");
                    report.failures += 1;
                    continue;
                }
            };
            report.synthesized += 1;

            match self.store.create_article(&article, item).await {
                Ok(stored) => {
                    report.persisted += 1;
                    info!(id = stored.id, slug = %stored.slug, "Item persisted");
                }
                Err(e) => {
                    // Never marked persisted, so the next cycle retries it.
                    warn!(title = %item.title, error = %e, "Persist failed; skipping item");
                    report.failures += 1;
                }
            }
        }

        report.index_rebuilt = self.rebuild_index().await;

        info!(
            fetched = report.fetched,
            skipped_duplicates = report.skipped_duplicates,
            synthesized = report.synthesized,
            persisted = report.persisted,
            failures = report.failures,
            index_rebuilt = report.index_rebuilt,
            "Ingestion cycle complete"
        );
        report
    }

    /// Rebuilds the index from the full store. On failure the previous
    /// snapshot stays in place and the next cycle retries.
    pub async fn rebuild_index(&self) -> bool {
        let articles = match self.store.list_all_articles().await {
            Ok(articles) => articles,
            Err(e) => {
                error!(error = %e, "Could not list articles for index rebuild");
                return false;
            }
        };
        match self.index.rebuild(&articles).await {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "Index rebuild failed; previous index kept");
                false
            }
        }
    }
}
