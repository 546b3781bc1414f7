//! # Shared Data Model
//!
//! The structs that flow between the pipeline stages: raw feed items in,
//! generated bilingual articles out, and the stored/answer shapes the
//! storage and retrieval layers exchange.

use serde::{Deserialize, Serialize};

/// A single news item as it comes off a feed, after filtering.
///
/// `raw_text` is the richer of the item's content and description. The
/// image, when present, was scraped from the article page's OpenGraph or
/// Twitter card metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct RawNewsItem {
    pub title: String,
    pub raw_text: String,
    pub link: String,
    pub image_url: Option<String>,
    pub source_name: String,
    pub credibility: u8,
}

/// The bilingual article the model produces for one news item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedArticle {
    pub title: String,
    pub title_en: String,
    pub summary: String,
    pub summary_en: String,
    pub content: String,
    pub content_en: String,
    pub category: Category,
}

/// The closed set of article categories.
///
/// Model output is free text; [`Category::from_label`] folds whatever the
/// model said into one of these. Unrecognized labels collapse to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Llm,
    Frameworks,
    Hardware,
    Market,
    Other,
}

impl Category {
    /// The human-facing Italian label, as stored and displayed.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Llm => "Modelli LLM",
            Category::Frameworks => "Framework e Tool",
            Category::Hardware => "Hardware e Edge",
            Category::Market => "Mercato e Aziende",
            Category::Other => "Altro",
        }
    }

    /// URL-safe identifier for the category.
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Llm => "modelli-llm",
            Category::Frameworks => "framework-e-tool",
            Category::Hardware => "hardware-e-edge",
            Category::Market => "mercato-e-aziende",
            Category::Other => "altro",
        }
    }

    /// Default icon used when the category row is first created.
    pub fn icon(&self) -> &'static str {
        match self {
            Category::Llm => "🧠",
            Category::Frameworks => "🛠️",
            Category::Hardware => "🖥️",
            Category::Market => "📈",
            Category::Other => "📰",
        }
    }

    /// Default description used when the category row is first created.
    pub fn description(&self) -> &'static str {
        match self {
            Category::Llm => "Novità su modelli linguistici e generativi.",
            Category::Frameworks => "Librerie, framework e strumenti di sviluppo.",
            Category::Hardware => "Acceleratori, edge computing e infrastruttura.",
            Category::Market => "Investimenti, acquisizioni e strategie aziendali.",
            Category::Other => "Notizie che non rientrano nelle altre categorie.",
        }
    }

    /// Folds a free-text label from the model into the closed set.
    ///
    /// Case-insensitive substring match; anything unrecognized becomes
    /// `Other`.
    pub fn from_label(label: &str) -> Self {
        let lowered = label.to_lowercase();
        if lowered.contains("llm") || lowered.contains("language model") {
            Category::Llm
        } else if lowered.contains("frame") {
            Category::Frameworks
        } else if lowered.contains("hard") || lowered.contains("gpu") || lowered.contains("mini") {
            Category::Hardware
        } else if lowered.contains("market") || lowered.contains("mercato") {
            Category::Market
        } else {
            Category::Other
        }
    }
}

/// An article as persisted, with its storage-assigned identity.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredArticle {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub summary: String,
    pub content: String,
    pub title_en: String,
    pub summary_en: String,
    pub content_en: String,
    pub category_label: String,
    pub category_slug: String,
    pub source_url: String,
    pub source_name: String,
    pub credibility: u8,
    pub image_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A citation pointing at a stored article, in retrieval order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceRef {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub category: String,
}

/// The grounded answer returned for a question, with its citations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerResult {
    pub question: String,
    pub answer: String,
    pub sources: Vec<SourceRef>,
}
