// src/ingest/scheduler.rs
use metrics::counter;

use crate::ingest::types::FeedFetcher;
use crate::sources::Source;
use crate::store::ArticleStore;

#[derive(Clone, Copy, Debug)]
pub struct IngestSchedulerCfg {
    pub interval_secs: u64,
}

/// Re-run ingestion on a fixed interval. Used when the binary is deployed as a
/// long-lived process instead of being invoked by an external cron.
pub async fn run_forever(
    cfg: IngestSchedulerCfg,
    fetcher: &dyn FeedFetcher,
    store: &dyn ArticleStore,
    sources: &[Source],
) {
    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(cfg.interval_secs));
    loop {
        ticker.tick().await;
        let stats = crate::ingest::run_once(fetcher, store, sources).await;
        counter!("ingest_runs_total").increment(1);
        tracing::info!(
            target: "ingest",
            added = stats.total_added,
            skipped = stats.total_skipped,
            errors = stats.total_errors,
            "scheduled ingest tick"
        );
    }
}
