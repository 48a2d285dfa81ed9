// src/view.rs
//! Read-path mapping from stored documents to the shape the frontend consumes.

use serde::Serialize;

use crate::store::ArticleRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub image_url: String,
    pub source_url: String,
    pub source_name: String,
    pub published_at: String,
    pub tags: Vec<String>,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maker: Option<String>,
    pub country: String,
    pub language: String,
    pub expires_at: String,
}

impl Article {
    /// Stored `tags` is a serialized JSON array; older documents may miss the
    /// optional locale fields entirely.
    pub fn from_record(record: ArticleRecord) -> Self {
        let f = record.fields;
        let tags: Vec<String> = serde_json::from_str(&f.tags).unwrap_or_default();
        Self {
            id: record.id,
            title: f.title,
            summary: f.summary,
            content: f.content,
            image_url: f.image_url,
            source_url: f.source_url,
            source_name: f.source_name,
            published_at: f.published_at,
            tags,
            category: f.category,
            maker: f.maker,
            country: f.country.unwrap_or_else(|| "other".to_string()),
            language: f.language.unwrap_or_else(|| "en".to_string()),
            expires_at: f.expires_at,
        }
    }
}
