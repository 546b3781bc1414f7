//! # Raw Item Fetcher
//!
//! This module pulls the registered syndication feeds, applies the topical
//! filters and the age cutoff, and resolves a candidate image per item. A
//! failing feed is logged and skipped; one bad feed never aborts the run.

mod filter;
mod image;

pub use filter::FeedFilter;

use crate::sources::FeedSource;
use crate::types::RawNewsItem;
use chrono::{Duration, Utc};
use rss::Channel;
use std::time::Duration as StdDuration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Custom error types for the feed fetching process.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("Failed to fetch feed: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("Failed to parse feed: {0}")]
    Parse(#[from] rss::Error),
    #[error("Failed to compile filter patterns: {0}")]
    FilterBuild(#[from] regex::Error),
}

/// Tunables for one fetch run.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Entries with a parseable publish date older than this are dropped.
    pub lookback_days: i64,
    /// Maximum accepted items per feed.
    pub per_feed_limit: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            lookback_days: 7,
            per_feed_limit: 5,
        }
    }
}

/// Fetches and filters raw news items from the feed registry.
#[derive(Debug, Clone)]
pub struct FeedFetcher {
    client: reqwest::Client,
    options: FetchOptions,
    filter: FeedFilter,
}

impl FeedFetcher {
    /// Page scrapes for image metadata must never stall an item for long.
    const SCRAPE_TIMEOUT_SECS: u64 = 10;

    pub fn new(options: FetchOptions) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(StdDuration::from_secs(Self::SCRAPE_TIMEOUT_SECS))
            .build()
            .map_err(FeedError::ClientBuild)?;
        let filter = FeedFilter::new()?;
        Ok(Self {
            client,
            options,
            filter,
        })
    }

    /// Fetches every registered feed, skipping feeds that fail.
    pub async fn fetch_all(&self, sources: &[FeedSource]) -> Vec<RawNewsItem> {
        let mut items = Vec::new();
        for source in sources {
            match self.fetch_feed(source).await {
                Ok(mut feed_items) => {
                    info!(
                        feed = %source.name,
                        accepted = feed_items.len(),
                        "Feed processed"
                    );
                    items.append(&mut feed_items);
                }
                Err(e) => {
                    warn!(feed = %source.name, error = %e, "Skipping feed");
                }
            }
        }
        items
    }

    /// Fetches and filters a single feed.
    pub async fn fetch_feed(&self, source: &FeedSource) -> Result<Vec<RawNewsItem>, FeedError> {
        let content = self
            .client
            .get(&source.url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        let channel = Channel::read_from(&content[..])?;

        let cutoff = Utc::now() - Duration::days(self.options.lookback_days);
        let mut items = Vec::new();

        for item in channel.items() {
            if items.len() >= self.options.per_feed_limit {
                break;
            }

            let (Some(title), Some(link)) = (item.title(), item.link()) else {
                continue;
            };

            // Entries carrying a parseable publish date older than the
            // lookback window are dropped; undated entries pass.
            if let Some(pub_date) = item.pub_date() {
                if let Ok(published) = chrono::DateTime::parse_from_rfc2822(pub_date) {
                    if published.with_timezone(&Utc) < cutoff {
                        debug!(title = %title, "Dropping stale entry");
                        continue;
                    }
                }
            }

            let body = richer_body(item);
            let raw_text = filter::strip_html(&body);
            if title.trim().is_empty() || raw_text.trim().is_empty() {
                continue;
            }

            let haystack = format!("{title}\n{raw_text}");
            if !self.filter.is_ai_related(&haystack) {
                debug!(title = %title, "Dropping off-topic entry");
                continue;
            }

            let image_url = self.resolve_image(item, link).await;

            items.push(RawNewsItem {
                title: title.to_string(),
                raw_text,
                link: link.to_string(),
                image_url,
                source_name: source.name.clone(),
                credibility: source.credibility,
            });
        }

        Ok(items)
    }

    /// Best-effort image candidate: feed metadata first, then a bounded
    /// scrape of the article page. Every failure degrades to `None`.
    async fn resolve_image(&self, item: &rss::Item, link: &str) -> Option<String> {
        if let Some(url) = image::from_feed_item(item) {
            return Some(url);
        }

        let page = match self.client.get(link).send().await {
            Ok(response) if response.status().is_success() => match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!(link = %link, error = %e, "Image scrape body read failed");
                    return None;
                }
            },
            Ok(response) => {
                debug!(link = %link, status = %response.status(), "Image scrape rejected");
                return None;
            }
            Err(e) => {
                debug!(link = %link, error = %e, "Image scrape request failed");
                return None;
            }
        };

        image::from_page_html(&page)
    }
}

/// Prefers the richer of the entry's content block and its description.
fn richer_body(item: &rss::Item) -> String {
    let content = item.content().unwrap_or_default();
    let description = item.description().unwrap_or_default();
    if content.len() >= description.len() {
        content.to_string()
    } else {
        description.to_string()
    }
}
