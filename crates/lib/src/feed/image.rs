//! Image candidate extraction: feed media metadata first, then the article
//! page's Open Graph / Twitter-card / hero-image markup.

use scraper::{Html, Selector};

/// Reads an image URL from the entry's enclosure or media extension.
pub fn from_feed_item(item: &rss::Item) -> Option<String> {
    if let Some(enclosure) = item.enclosure() {
        if enclosure.mime_type().starts_with("image/") && !enclosure.url().is_empty() {
            return Some(enclosure.url().to_string());
        }
    }

    let media = item.extensions().get("media")?;
    for key in ["content", "thumbnail"] {
        if let Some(extensions) = media.get(key) {
            for extension in extensions {
                if let Some(url) = extension.attrs().get("url") {
                    if !url.is_empty() {
                        return Some(url.clone());
                    }
                }
            }
        }
    }
    None
}

/// Parses the article page and returns the best image candidate.
///
/// Synchronous on purpose: `scraper::Html` is not `Send`, so the parse must
/// complete before the caller awaits anything else.
pub fn from_page_html(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    for selector_str in [
        "meta[property='og:image']",
        "meta[name='og:image']",
        "meta[name='twitter:image']",
        "meta[property='twitter:image']",
    ] {
        if let Ok(selector) = Selector::parse(selector_str) {
            for element in document.select(&selector) {
                if let Some(content) = element.value().attr("content") {
                    if !content.trim().is_empty() {
                        return Some(content.trim().to_string());
                    }
                }
            }
        }
    }

    if let Ok(selector) = Selector::parse("article img") {
        for element in document.select(&selector) {
            if let Some(src) = element.value().attr("src") {
                if !src.trim().is_empty() {
                    return Some(src.trim().to_string());
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_open_graph_image() {
        let html = r#"<html><head>
            <meta property="og:image" content="https://example.com/og.jpg">
            <meta name="twitter:image" content="https://example.com/tw.jpg">
        </head><body><article><img src="/hero.jpg"></article></body></html>"#;
        assert_eq!(
            from_page_html(html),
            Some("https://example.com/og.jpg".to_string())
        );
    }

    #[test]
    fn falls_back_to_twitter_card_then_hero() {
        let html = r#"<html><head>
            <meta name="twitter:image" content="https://example.com/tw.jpg">
        </head><body></body></html>"#;
        assert_eq!(
            from_page_html(html),
            Some("https://example.com/tw.jpg".to_string())
        );

        let html = r#"<html><body><article><img src="https://example.com/hero.jpg"></article></body></html>"#;
        assert_eq!(
            from_page_html(html),
            Some("https://example.com/hero.jpg".to_string())
        );
    }

    #[test]
    fn returns_none_without_candidates() {
        assert_eq!(from_page_html("<html><body><p>text</p></body></html>"), None);
    }

    #[test]
    fn reads_enclosure_from_feed_item() {
        let mut enclosure = rss::Enclosure::default();
        enclosure.set_url("https://example.com/pic.png");
        enclosure.set_mime_type("image/png");
        let mut item = rss::Item::default();
        item.set_enclosure(enclosure);
        assert_eq!(
            from_feed_item(&item),
            Some("https://example.com/pic.png".to_string())
        );
    }
}
