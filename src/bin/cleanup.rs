//! Cleanup job — binary entrypoint.
//! Deletes every stored article whose `expiresAt` has passed, in pages of 100,
//! and prints the deleted count as JSON on stdout.

use chrono::Utc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use am_news_aggregator::cleanup::purge_expired;
use am_news_aggregator::store::appwrite::AppwriteStore;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("am_news_aggregator=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let store = AppwriteStore::from_env()?;
    let deleted = purge_expired(&store, Utc::now()).await;
    println!("{}", serde_json::json!({ "deleted": deleted }));
    Ok(())
}
