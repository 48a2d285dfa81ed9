//! Scraper job — binary entrypoint.
//! Polls the configured RSS sources once, classifies and deduplicates entries,
//! persists new articles, and prints the run summary as JSON on stdout.
//!
//! Set `INGEST_INTERVAL_SECS` to keep the process alive and re-run on a fixed
//! interval instead; set `INGEST_DRY_RUN=1` to run against an in-memory store.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use am_news_aggregator::ingest::fetcher::RssFetcher;
use am_news_aggregator::ingest::scheduler::{run_forever, IngestSchedulerCfg};
use am_news_aggregator::store::appwrite::AppwriteStore;
use am_news_aggregator::{load_sources_default, run_once, ArticleStore, MemoryStore};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("am_news_aggregator=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

fn build_store() -> anyhow::Result<Box<dyn ArticleStore>> {
    if std::env::var("INGEST_DRY_RUN").ok().as_deref() == Some("1") {
        tracing::info!("dry run: using in-memory store");
        return Ok(Box::new(MemoryStore::new()));
    }
    Ok(Box::new(AppwriteStore::from_env()?))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let sources = load_sources_default()?;
    let fetcher = RssFetcher::new();
    let store = build_store()?;

    if let Some(interval_secs) = std::env::var("INGEST_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
    {
        let cfg = IngestSchedulerCfg { interval_secs };
        run_forever(cfg, &fetcher, store.as_ref(), &sources).await;
        return Ok(());
    }

    let stats = run_once(&fetcher, store.as_ref(), &sources).await;
    println!("{}", serde_json::to_string(&stats)?);
    Ok(())
}
