// tests/ingest_pipeline.rs
use am_news_aggregator::ingest::fetcher::FixtureFetcher;
use am_news_aggregator::ingest::{run_once, MAX_ENTRIES_PER_SOURCE};
use am_news_aggregator::store::MemoryStore;
use am_news_aggregator::view::Article;
use am_news_aggregator::Source;

const FEED_A: &str = include_str!("fixtures/printnews_a.xml");
const FEED_MANY: &str = include_str!("fixtures/printnews_many.xml");

fn source_a() -> Source {
    Source::new("Print News A", "https://a.example/feed", "usa", "en")
}

#[tokio::test]
async fn run_persists_classified_articles() {
    let fetcher = FixtureFetcher::new().with_feed("https://a.example/feed", FEED_A);
    let store = MemoryStore::new();

    let stats = run_once(&fetcher, &store, &[source_a()]).await;

    // Feed A holds three items; the orphan without link/guid counts as nothing.
    assert_eq!(stats.total_added, 2);
    assert_eq!(stats.total_skipped, 0);
    assert_eq!(stats.total_errors, 0);
    assert_eq!(store.len(), 2);

    let articles: Vec<Article> = store
        .snapshot()
        .into_iter()
        .map(Article::from_record)
        .collect();

    let pla = articles
        .iter()
        .find(|a| a.source_url == "https://a.example/pla-filament")
        .expect("pla article stored");
    // Materials keywords are checked before hardware, so "hotend" in the body
    // does not win.
    assert_eq!(pla.category, "materials");
    assert_eq!(pla.maker.as_deref(), Some("prusa"));
    assert!(pla.tags.contains(&"PLA".to_string()));
    assert_eq!(pla.image_url, "https://a.example/img/pla.jpg");
    assert_eq!(pla.published_at, "2024-01-01T08:00:00.000Z");
    assert_eq!(pla.country, "usa");
    assert_eq!(pla.source_name, "Print News A");

    let bambu = articles
        .iter()
        .find(|a| a.source_url == "tag:a.example,2024:bambu-studio")
        .expect("guid-keyed article stored");
    assert_eq!(bambu.category, "software");
    assert_eq!(bambu.maker.as_deref(), Some("bambu"));
}

#[tokio::test]
async fn rerun_over_unchanged_feed_adds_nothing() {
    let fetcher = FixtureFetcher::new().with_feed("https://a.example/feed", FEED_A);
    let store = MemoryStore::new();

    let first = run_once(&fetcher, &store, &[source_a()]).await;
    assert_eq!(first.total_added, 2);

    let second = run_once(&fetcher, &store, &[source_a()]).await;
    assert_eq!(second.total_added, 0);
    assert_eq!(second.total_skipped, 2);
    assert_eq!(second.total_errors, 0);
    assert_eq!(store.len(), 2, "no duplicates created");
}

#[tokio::test]
async fn per_source_entry_count_is_bounded() {
    let fetcher = FixtureFetcher::new().with_feed("https://many.example/feed", FEED_MANY);
    let store = MemoryStore::new();
    let source = Source::new("Print News Many", "https://many.example/feed", "usa", "en");

    let stats = run_once(&fetcher, &store, &[source]).await;

    assert_eq!(stats.total_added, MAX_ENTRIES_PER_SOURCE as u64);
    assert_eq!(store.len(), MAX_ENTRIES_PER_SOURCE);
}
