//! Topical filtering for feed entries: a curated AI/ML inclusion set and a
//! commerce/deal exclusion set matched as whole words only, so "deal" never
//! fires on "ideal".

use regex::Regex;

/// Keywords at least one of which must appear in title+body.
const AI_KEYWORDS: &[&str] = &[
    "ai",
    "artificial intelligence",
    "intelligenza artificiale",
    "machine learning",
    "deep learning",
    "neural network",
    "llm",
    "large language model",
    "language model",
    "gpt",
    "chatbot",
    "openai",
    "anthropic",
    "gemini",
    "hugging face",
    "transformer",
    "generative",
    "diffusion model",
    "fine-tuning",
    "inference",
];

/// Keywords whose whole-word presence rejects an entry outright.
const EXCLUSION_KEYWORDS: &[&str] = &[
    "deal",
    "deals",
    "sale",
    "discount",
    "coupon",
    "promo",
    "giveaway",
    "black friday",
    "prime day",
    "soundbar",
    "headphones",
    "earbuds",
    "smartwatch",
    "vacuum",
];

/// Compiled inclusion/exclusion patterns, built once per fetcher.
#[derive(Debug, Clone)]
pub struct FeedFilter {
    include: Regex,
    exclude: Regex,
}

impl FeedFilter {
    pub fn new() -> Result<Self, regex::Error> {
        let include = Regex::new(&word_boundary_pattern(AI_KEYWORDS))?;
        let exclude = Regex::new(&word_boundary_pattern(EXCLUSION_KEYWORDS))?;
        Ok(Self { include, exclude })
    }

    /// True when the text mentions at least one AI keyword and no exclusion
    /// keyword as a whole word.
    pub fn is_ai_related(&self, text: &str) -> bool {
        if self.exclude.is_match(text) {
            return false;
        }
        self.include.is_match(text)
    }
}

fn word_boundary_pattern(keywords: &[&str]) -> String {
    let alternatives = keywords
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    format!(r"(?i)\b(?:{alternatives})\b")
}

/// Replaces markup with spaces and collapses runs of whitespace, leaving
/// plain text usable for filtering and prompting.
pub fn strip_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    for c in input.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
