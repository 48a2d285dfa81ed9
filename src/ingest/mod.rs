// src/ingest/mod.rs
pub mod fetcher;
pub mod normalize;
pub mod scheduler;
pub mod types;

use chrono::Utc;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::ingest::normalize::{draft_from_entry, NormalizeOutcome};
use crate::ingest::types::FeedFetcher;
use crate::sources::Source;
use crate::store::ArticleStore;

/// Only the first N entries of each feed are processed per run; feeds are
/// re-polled frequently enough that the tail is picked up next time.
pub const MAX_ENTRIES_PER_SOURCE: usize = 10;

/// Run summary returned to the scheduled invoker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub total_added: u64,
    pub total_skipped: u64,
    pub total_errors: u64,
}

/// One-time metrics registration (so series carry descriptions).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_entries_total", "Raw entries parsed from feeds.");
        describe_counter!("ingest_added_total", "Articles persisted.");
        describe_counter!(
            "ingest_skipped_total",
            "Entries skipped as duplicates of stored articles."
        );
        describe_counter!("ingest_errors_total", "Per-source and per-item failures.");
        describe_counter!(
            "ingest_dedup_failopen_total",
            "Dedup lookups that failed and were treated as not-existing."
        );
        describe_counter!("ingest_runs_total", "Scheduled ingest loop iterations.");
        describe_histogram!("ingest_parse_ms", "Feed parse time in milliseconds.");
        describe_gauge!("ingest_last_run_ts", "Unix ts when ingestion last ran.");
    });
}

/// Deduplication gate: does an article with this canonical url already exist?
///
/// A failed lookup is treated as "does not exist" so a storage hiccup cannot
/// stall the whole run; the trade is a possible duplicate insert, which is why
/// the failure is logged and counted rather than swallowed silently.
pub async fn article_exists(store: &dyn ArticleStore, source_url: &str) -> bool {
    match store.count_by_field("sourceUrl", source_url, 1).await {
        Ok(n) => n > 0,
        Err(e) => {
            tracing::warn!(
                error = ?e,
                source_url,
                "dedup lookup failed, treating article as new"
            );
            counter!("ingest_dedup_failopen_total").increment(1);
            false
        }
    }
}

/// Run ingestion once across the whole source registry.
///
/// Sources and entries are processed strictly sequentially. Failures never
/// abort the run: a fetch error skips the source, an item error skips the
/// item, and both increment `total_errors`.
pub async fn run_once(
    fetcher: &dyn FeedFetcher,
    store: &dyn ArticleStore,
    sources: &[Source],
) -> RunStats {
    ensure_metrics_described();
    let mut stats = RunStats::default();

    for source in sources {
        tracing::info!(source = %source.name, "fetching feed");
        let entries = match fetcher.fetch(&source.feed_url).await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = ?e, source = %source.name, "feed fetch failed");
                stats.total_errors += 1;
                counter!("ingest_errors_total").increment(1);
                continue;
            }
        };

        for entry in entries.iter().take(MAX_ENTRIES_PER_SOURCE) {
            let now = Utc::now();
            let draft = match draft_from_entry(entry, source, now) {
                NormalizeOutcome::Draft(d) => d,
                // No usable url: not an article, not an error.
                NormalizeOutcome::SkippedNoUrl => continue,
            };

            if article_exists(store, &draft.source_url).await {
                stats.total_skipped += 1;
                counter!("ingest_skipped_total").increment(1);
                continue;
            }

            match store.create(draft.to_fields()).await {
                Ok(_) => {
                    stats.total_added += 1;
                    counter!("ingest_added_total").increment(1);
                    let title: String = draft.title.chars().take(60).collect();
                    tracing::info!(source = %source.name, %title, "added article");
                }
                Err(e) => {
                    tracing::warn!(error = ?e, source = %source.name, "persist failed");
                    stats.total_errors += 1;
                    counter!("ingest_errors_total").increment(1);
                }
            }
        }
    }

    gauge!("ingest_last_run_ts").set(Utc::now().timestamp().max(0) as f64);
    tracing::info!(
        added = stats.total_added,
        skipped = stats.total_skipped,
        errors = stats.total_errors,
        "ingest run finished"
    );
    stats
}
