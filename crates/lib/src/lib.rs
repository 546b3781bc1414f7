//! # Observatory
//!
//! This crate implements an ingestion-and-retrieval pipeline for AI news:
//! feed fetching and filtering, LLM-driven bilingual article synthesis with
//! recovery from malformed structured output, deduplicated persistence into
//! a local SQLite store, a rebuildable embedding index, and grounded
//! question answering over the accumulated archive.

pub mod answer;
pub mod errors;
pub mod feed;
pub mod index;
pub mod pipeline;
pub mod prompts;
pub mod providers;
pub mod sources;
pub mod store;
pub mod synthesis;
pub mod types;

pub use answer::{AnswerEngine, AnswerError, DEFAULT_TOP_K};
pub use errors::PromptError;
pub use feed::{FeedError, FeedFetcher, FetchOptions};
pub use index::{EmbeddingConfig, IndexError, VectorIndex};
pub use pipeline::{CycleReport, IngestPipeline};
pub use providers::ai::{generate_embedding, AiProvider, ChatProvider};
pub use sources::{default_sources, FeedSource};
pub use store::{ArticleStore, StoreError};
pub use synthesis::{ArticleSynthesizer, SynthesisError};
pub use types::{AnswerResult, Category, GeneratedArticle, RawNewsItem, SourceRef, StoredArticle};
