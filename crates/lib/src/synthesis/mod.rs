//! # Content Synthesizer
//!
//! Turns one raw news item into a curated, bilingual, categorized article
//! by prompting the generative model and coercing its output back into a
//! well-formed record, repairing the known failure modes along the way.

mod flatten;
mod recovery;

pub use flatten::{flatten_content, ContentField};
pub use recovery::extract_json_block;

use crate::errors::PromptError;
use crate::prompts::{BUILTIN_GLOSSARY, SYNTHESIS_SYSTEM_PROMPT, SYNTHESIS_USER_PROMPT};
use crate::providers::ai::AiProvider;
use crate::types::{Category, GeneratedArticle, RawNewsItem};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Custom error types for the synthesis process.
#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("AI provider failed: {0}")]
    Llm(#[from] PromptError),
    #[error("Malformed model output ({reason}); raw response retained")]
    MalformedOutput { reason: String, raw: String },
}

/// The model response before normalization. Content fields may arrive as
/// nested objects; missing English fields fall back to the Italian ones.
#[derive(Debug, Deserialize)]
struct ModelArticle {
    #[serde(default)]
    title: String,
    #[serde(default)]
    title_en: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    summary_en: String,
    #[serde(default)]
    content: ContentField,
    #[serde(default)]
    content_en: ContentField,
    #[serde(default)]
    category: String,
}

/// Synthesizes curated articles through a pluggable AI provider.
#[derive(Debug, Clone)]
pub struct ArticleSynthesizer {
    provider: Box<dyn AiProvider>,
}

impl ArticleSynthesizer {
    pub fn new(provider: Box<dyn AiProvider>) -> Self {
        Self { provider }
    }

    /// Generates a bilingual article for one raw item.
    ///
    /// `glossary_overrides` are (banned, preferred) pairs appended to the
    /// built-in terminology table in the system prompt.
    pub async fn synthesize(
        &self,
        item: &RawNewsItem,
        glossary_overrides: &[(String, String)],
    ) -> Result<GeneratedArticle, SynthesisError> {
        let system_prompt =
            SYNTHESIS_SYSTEM_PROMPT.replace("{glossary}", &render_glossary(glossary_overrides));
        let user_prompt = SYNTHESIS_USER_PROMPT
            .replace("{title}", &item.title)
            .replace("{text}", &item.raw_text);

        info!(title = %item.title, source = %item.source_name, "Synthesizing article");
        let raw = self.provider.generate(&system_prompt, &user_prompt).await?;
        debug!(response_len = raw.len(), "<-- Model response received");

        let json_block =
            extract_json_block(&raw).map_err(|reason| SynthesisError::MalformedOutput {
                reason,
                raw: raw.clone(),
            })?;

        let parsed: ModelArticle =
            serde_json::from_str(&json_block).map_err(|e| SynthesisError::MalformedOutput {
                reason: format!("JSON deserialization failed: {e}"),
                raw: raw.clone(),
            })?;

        let content = flatten_content(parsed.content);
        let content_en = flatten_content(parsed.content_en);

        if parsed.title.trim().is_empty() || content.trim().is_empty() {
            return Err(SynthesisError::MalformedOutput {
                reason: "model returned empty title or content".to_string(),
                raw,
            });
        }

        let title_en = non_empty_or(parsed.title_en, &parsed.title);
        let summary_en = non_empty_or(parsed.summary_en, &parsed.summary);
        let content_en = if content_en.trim().is_empty() {
            content.clone()
        } else {
            content_en
        };

        Ok(GeneratedArticle {
            title: parsed.title,
            title_en,
            summary: parsed.summary,
            summary_en,
            content,
            content_en,
            category: Category::from_label(&parsed.category),
        })
    }
}

/// Renders the terminology substitution table for the system prompt.
fn render_glossary(overrides: &[(String, String)]) -> String {
    let mut lines: Vec<String> = BUILTIN_GLOSSARY
        .iter()
        .map(|(banned, preferred)| format!("- vietato \"{banned}\", usa \"{preferred}\""))
        .collect();
    for (banned, preferred) in overrides {
        lines.push(format!("- vietato \"{banned}\", usa \"{preferred}\""));
    }
    lines.join("\n")
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glossary_rendering_includes_builtins_and_overrides() {
        let overrides = vec![("rete profonda".to_string(), "deep network".to_string())];
        let table = render_glossary(&overrides);
        assert!(table.contains("machine learning"));
        assert!(table.contains("vietato \"rete profonda\", usa \"deep network\""));
        assert_eq!(table.lines().count(), BUILTIN_GLOSSARY.len() + 1);
    }

    #[test]
    fn model_article_tolerates_missing_fields() {
        let parsed: ModelArticle =
            serde_json::from_str(r#"{"title": "T", "content": "C"}"#).unwrap();
        assert_eq!(parsed.title, "T");
        assert_eq!(parsed.title_en, "");
        assert_eq!(flatten_content(parsed.content), "C");
    }
}
