// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod classify;
pub mod cleanup;
pub mod sources;
pub mod store;
pub mod view;

// Ingestion pipeline (fetcher, normalizer, dedup gate, orchestrator, scheduler)
pub mod ingest;

// ---- Re-exports for stable public API ----
pub use crate::ingest::{run_once, RunStats};
pub use crate::sources::{default_sources, load_sources_default, Source};
pub use crate::store::{ArticleStore, MemoryStore};
pub use crate::view::Article;
