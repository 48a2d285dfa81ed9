// src/ingest/types.rs
use anyhow::Result;

/// One feed item as fetched, before normalization. Every field is optional;
/// the normalizer decides what survives.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RawFeedEntry {
    pub link: Option<String>,
    pub guid: Option<String>,
    pub title: Option<String>,
    /// Plain-text rendering of the feed description, if any.
    pub content_snippet: Option<String>,
    /// Full content body (e.g. `content:encoded`), if any.
    pub content: Option<String>,
    pub summary: Option<String>,
    pub enclosure_url: Option<String>,
    /// ISO-8601 date string, if the feed provides one.
    pub iso_date: Option<String>,
    /// RFC 2822 `pubDate` string, if the feed provides one.
    pub pub_date: Option<String>,
}

#[async_trait::async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self, feed_url: &str) -> Result<Vec<RawFeedEntry>>;
}
