// src/cleanup.rs
use chrono::{DateTime, Utc};

use crate::ingest::normalize::to_iso;
use crate::store::ArticleStore;

/// Expired articles are deleted in pages of this size.
pub const PAGE_LIMIT: usize = 100;

/// Delete every article whose `expiresAt` is strictly before `now`, page by
/// page until a page comes back empty. Best-effort: a storage failure ends the
/// sweep early and the count so far is returned; the next scheduled run picks
/// up the remainder.
pub async fn purge_expired(store: &dyn ArticleStore, now: DateTime<Utc>) -> u64 {
    let cutoff = to_iso(&now);
    let mut deleted: u64 = 0;

    loop {
        let page = match store.list_expired_before(&cutoff, PAGE_LIMIT).await {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = ?e, deleted, "cleanup list failed, stopping sweep");
                break;
            }
        };
        if page.is_empty() {
            break;
        }

        for doc in page {
            match store.delete(&doc.id).await {
                Ok(()) => deleted += 1,
                Err(e) => {
                    tracing::warn!(error = ?e, id = %doc.id, deleted, "cleanup delete failed, stopping sweep");
                    return deleted;
                }
            }
        }
        tracing::info!(deleted, "cleanup progress");
    }

    tracing::info!(deleted, "cleanup finished");
    deleted
}
