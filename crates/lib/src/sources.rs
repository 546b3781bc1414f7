//! # Feed Source Registry
//!
//! The static list of syndication feeds the pipeline harvests, each with a
//! display name and a 1-5 credibility tier carried through to persisted
//! articles.

/// A single feed the fetcher should poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSource {
    pub url: String,
    pub name: String,
    /// Trust tier, 1 (lowest) to 5 (highest).
    pub credibility: u8,
}

impl FeedSource {
    pub fn new(url: &str, name: &str, credibility: u8) -> Self {
        Self {
            url: url.to_string(),
            name: name.to_string(),
            credibility,
        }
    }
}

/// The curated default registry.
pub fn default_sources() -> Vec<FeedSource> {
    vec![
        FeedSource::new("https://openai.com/blog/rss.xml", "OpenAI Blog", 5),
        FeedSource::new("https://huggingface.co/blog/feed.xml", "Hugging Face Blog", 5),
        FeedSource::new(
            "https://blog.google/technology/ai/rss/",
            "Google AI Blog",
            5,
        ),
        FeedSource::new(
            "https://www.theverge.com/rss/ai-artificial-intelligence/index.xml",
            "The Verge AI",
            4,
        ),
        FeedSource::new("https://venturebeat.com/category/ai/feed/", "VentureBeat AI", 3),
        FeedSource::new(
            "https://www.technologyreview.com/topic/artificial-intelligence/feed",
            "MIT Technology Review",
            4,
        ),
    ]
}
