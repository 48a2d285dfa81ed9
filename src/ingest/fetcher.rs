// src/ingest/fetcher.rs
use std::collections::HashMap;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::ingest::types::{FeedFetcher, RawFeedEntry};

/// Per-request timeout. An unresponsive source must not stall the run.
const FETCH_TIMEOUT: Duration = Duration::from_secs(8);
const USER_AGENT: &str = "am-news-aggregator/0.1";

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    guid: Option<Guid>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
    #[serde(rename = "content:encoded")]
    content_encoded: Option<String>,
    enclosure: Option<Enclosure>,
}

#[derive(Debug, Deserialize)]
struct Guid {
    #[serde(rename = "$text")]
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Enclosure {
    #[serde(rename = "@url")]
    url: Option<String>,
}

/// Decode HTML entities, strip tags, collapse whitespace. Feed descriptions
/// routinely carry markup; the snippet field must be plain text.
pub fn strip_html(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();

    out.trim().to_string()
}

/// Parse an RSS 2.0 document into raw entries. Pure; exposed for fixture tests.
pub fn parse_feed(xml: &str) -> Result<Vec<RawFeedEntry>> {
    let t0 = std::time::Instant::now();
    let rss: Rss = from_str(xml).context("parsing rss xml")?;

    let mut out = Vec::with_capacity(rss.channel.items.len());
    for it in rss.channel.items {
        let snippet = it
            .description
            .as_deref()
            .map(strip_html)
            .filter(|s| !s.is_empty());
        out.push(RawFeedEntry {
            link: it.link.filter(|s| !s.trim().is_empty()),
            guid: it.guid.and_then(|g| g.value).filter(|s| !s.trim().is_empty()),
            title: it.title,
            content_snippet: snippet,
            content: it.content_encoded,
            summary: None,
            enclosure_url: it.enclosure.and_then(|e| e.url),
            iso_date: None,
            pub_date: it.pub_date,
        });
    }

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("ingest_parse_ms").record(ms);
    counter!("ingest_entries_total").increment(out.len() as u64);
    Ok(out)
}

/// HTTP fetcher for live feeds.
pub struct RssFetcher {
    client: reqwest::Client,
}

impl RssFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .expect("failed to build http client");
        Self { client }
    }
}

impl Default for RssFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedFetcher for RssFetcher {
    async fn fetch(&self, feed_url: &str) -> Result<Vec<RawFeedEntry>> {
        let body = self
            .client
            .get(feed_url)
            .send()
            .await
            .with_context(|| format!("feed get {feed_url}"))?
            .error_for_status()
            .with_context(|| format!("feed non-2xx {feed_url}"))?
            .text()
            .await
            .context("feed body .text()")?;
        parse_feed(&body)
    }
}

/// In-memory fetcher mapping feed urls to fixture XML. Unknown urls fail like
/// an unreachable source would.
#[derive(Default)]
pub struct FixtureFetcher {
    feeds: HashMap<String, String>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(mut self, url: &str, xml: &str) -> Self {
        self.feeds.insert(url.to_string(), xml.to_string());
        self
    }
}

#[async_trait]
impl FeedFetcher for FixtureFetcher {
    async fn fetch(&self, feed_url: &str) -> Result<Vec<RawFeedEntry>> {
        let xml = self
            .feeds
            .get(feed_url)
            .ok_or_else(|| anyhow!("no fixture for {feed_url}"))?;
        parse_feed(xml)
    }
}
