// tests/ingest_errors.rs
use anyhow::{anyhow, Result};
use am_news_aggregator::ingest::fetcher::FixtureFetcher;
use am_news_aggregator::ingest::run_once;
use am_news_aggregator::store::{ArticleFields, ArticleRecord, ArticleStore, MemoryStore};
use am_news_aggregator::Source;

const FEED_A: &str = include_str!("fixtures/printnews_a.xml");

#[tokio::test]
async fn failing_source_does_not_abort_the_run() {
    // Only feed A is registered; the first source has no fixture and fails
    // like an unreachable host.
    let fetcher = FixtureFetcher::new().with_feed("https://a.example/feed", FEED_A);
    let store = MemoryStore::new();
    let sources = [
        Source::new("Dead Feed", "https://dead.example/feed", "usa", "en"),
        Source::new("Print News A", "https://a.example/feed", "usa", "en"),
    ];

    let stats = run_once(&fetcher, &store, &sources).await;

    assert_eq!(stats.total_errors, 1);
    assert_eq!(stats.total_added, 2, "later sources still processed");
    assert_eq!(store.len(), 2);
}

/// Store whose writes fail; lookups answer normally.
struct ReadOnlyStore {
    inner: MemoryStore,
}

#[async_trait::async_trait]
impl ArticleStore for ReadOnlyStore {
    async fn count_by_field(&self, field: &str, value: &str, limit: usize) -> Result<usize> {
        self.inner.count_by_field(field, value, limit).await
    }

    async fn create(&self, _fields: ArticleFields) -> Result<ArticleRecord> {
        Err(anyhow!("write quota exceeded"))
    }

    async fn list_expired_before(
        &self,
        cutoff: &str,
        page_limit: usize,
    ) -> Result<Vec<ArticleRecord>> {
        self.inner.list_expired_before(cutoff, page_limit).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.inner.delete(id).await
    }
}

#[tokio::test]
async fn persist_failures_count_per_item() {
    let fetcher = FixtureFetcher::new().with_feed("https://a.example/feed", FEED_A);
    let store = ReadOnlyStore {
        inner: MemoryStore::new(),
    };
    let source = Source::new("Print News A", "https://a.example/feed", "usa", "en");

    let stats = run_once(&fetcher, &store, &[source]).await;

    // Both keyed entries fail to persist; the orphan still counts as nothing.
    assert_eq!(stats.total_added, 0);
    assert_eq!(stats.total_skipped, 0);
    assert_eq!(stats.total_errors, 2);
}
