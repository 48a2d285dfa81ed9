// src/store/mod.rs
pub mod appwrite;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::classify::Category;

/// Typed article draft produced by the normalizer. Everything an article
/// carries except its storage-assigned id.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleDraft {
    pub title: String,
    pub summary: String,
    pub content: String,
    pub image_url: String,
    pub source_url: String,
    pub source_name: String,
    pub published_at: String,
    pub tags: Vec<String>,
    pub category: Category,
    pub maker: Option<String>,
    pub country: String,
    pub language: String,
    pub expires_at: String,
}

impl ArticleDraft {
    /// Wire shape for persistence. `tags` is stored as a serialized JSON
    /// string; the read path deserializes it back.
    pub fn to_fields(&self) -> ArticleFields {
        ArticleFields {
            title: self.title.clone(),
            summary: self.summary.clone(),
            content: self.content.clone(),
            image_url: self.image_url.clone(),
            source_url: self.source_url.clone(),
            source_name: self.source_name.clone(),
            published_at: self.published_at.clone(),
            tags: serde_json::to_string(&self.tags).unwrap_or_else(|_| "[]".to_string()),
            category: self.category.as_str().to_string(),
            maker: self.maker.clone(),
            country: Some(self.country.clone()),
            language: Some(self.language.clone()),
            expires_at: self.expires_at.clone(),
        }
    }
}

/// Stored document fields, camelCase on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleFields {
    pub title: String,
    pub summary: String,
    pub content: String,
    #[serde(default)]
    pub image_url: String,
    pub source_url: String,
    pub source_name: String,
    pub published_at: String,
    /// Serialized JSON array of tag labels.
    #[serde(default)]
    pub tags: String,
    pub category: String,
    #[serde(default)]
    pub maker: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    pub expires_at: String,
}

/// One persisted document: storage id plus fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleRecord {
    pub id: String,
    pub fields: ArticleFields,
}

/// Document-store collaborator contract. Consumed, not defined, by the
/// pipeline: equality/range/limit query primitives plus create and delete.
#[async_trait::async_trait]
pub trait ArticleStore: Send + Sync {
    /// Count documents where `field == value`, scanning at most `limit`.
    async fn count_by_field(&self, field: &str, value: &str, limit: usize) -> Result<usize>;

    /// Persist a new document; storage assigns the id.
    async fn create(&self, fields: ArticleFields) -> Result<ArticleRecord>;

    /// Page of documents with `expiresAt` strictly before `cutoff` (ISO-8601).
    async fn list_expired_before(&self, cutoff: &str, page_limit: usize)
        -> Result<Vec<ArticleRecord>>;

    async fn delete(&self, id: &str) -> Result<()>;
}

/// In-process store for tests and dry runs.
#[derive(Default)]
pub struct MemoryStore {
    inner: std::sync::Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    docs: Vec<ArticleRecord>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Vec<ArticleRecord> {
        self.inner.lock().unwrap().docs.clone()
    }
}

#[async_trait::async_trait]
impl ArticleStore for MemoryStore {
    async fn count_by_field(&self, field: &str, value: &str, limit: usize) -> Result<usize> {
        let inner = self.inner.lock().unwrap();
        let n = inner
            .docs
            .iter()
            .filter(|d| match field {
                "sourceUrl" => d.fields.source_url == value,
                "category" => d.fields.category == value,
                "sourceName" => d.fields.source_name == value,
                _ => false,
            })
            .take(limit)
            .count();
        Ok(n)
    }

    async fn create(&self, fields: ArticleFields) -> Result<ArticleRecord> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let record = ArticleRecord {
            id: format!("mem-{}", inner.next_id),
            fields,
        };
        inner.docs.push(record.clone());
        Ok(record)
    }

    async fn list_expired_before(
        &self,
        cutoff: &str,
        page_limit: usize,
    ) -> Result<Vec<ArticleRecord>> {
        let inner = self.inner.lock().unwrap();
        // Fixed-width ISO-8601 UTC strings compare chronologically.
        Ok(inner
            .docs
            .iter()
            .filter(|d| d.fields.expires_at.as_str() < cutoff)
            .take(page_limit)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.docs.retain(|d| d.id != id);
        Ok(())
    }
}
