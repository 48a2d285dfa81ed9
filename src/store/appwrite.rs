// src/store/appwrite.rs
//! Appwrite-compatible document store client.
//!
//! Talks to the hosted database the site runs on: a collection of article
//! documents addressed by `databases/{db}/collections/{collection}/documents`,
//! with string queries (`equal(..)`, `lessThan(..)`, `limit(..)`) and
//! project/key auth headers.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::{ArticleFields, ArticleRecord, ArticleStore};

const COLLECTION_ID: &str = "articles";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct AppwriteStore {
    endpoint: String,
    project_id: String,
    api_key: String,
    database_id: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct Doc {
    #[serde(rename = "$id")]
    id: String,
    #[serde(flatten)]
    fields: ArticleFields,
}

#[derive(Debug, Deserialize)]
struct DocList {
    total: usize,
    documents: Vec<Doc>,
}

impl From<Doc> for ArticleRecord {
    fn from(d: Doc) -> Self {
        ArticleRecord {
            id: d.id,
            fields: d.fields,
        }
    }
}

impl AppwriteStore {
    /// Read connection settings from the environment:
    /// `APPWRITE_ENDPOINT`, `APPWRITE_PROJECT_ID`, `APPWRITE_API_KEY`,
    /// `APPWRITE_DATABASE_ID`.
    pub fn from_env() -> Result<Self> {
        let get = |k: &str| std::env::var(k).with_context(|| format!("missing env var {k}"));
        Ok(Self::new(
            &get("APPWRITE_ENDPOINT")?,
            &get("APPWRITE_PROJECT_ID")?,
            &get("APPWRITE_API_KEY")?,
            &get("APPWRITE_DATABASE_ID")?,
        ))
    }

    pub fn new(endpoint: &str, project_id: &str, api_key: &str, database_id: &str) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build http client");
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            api_key: api_key.to_string(),
            database_id: database_id.to_string(),
            client,
        }
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.endpoint, self.database_id, COLLECTION_ID
        )
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("X-Appwrite-Project", &self.project_id)
            .header("X-Appwrite-Key", &self.api_key)
    }

    async fn list(&self, queries: &[String]) -> Result<DocList> {
        let params: Vec<(&str, &str)> = queries.iter().map(|q| ("queries[]", q.as_str())).collect();
        let list = self
            .authed(self.client.get(self.documents_url()).query(&params))
            .send()
            .await
            .context("document list get")?
            .error_for_status()
            .context("document list non-2xx")?
            .json::<DocList>()
            .await
            .context("document list body")?;
        Ok(list)
    }
}

fn equal_query(field: &str, value: &str) -> String {
    // serde_json handles quoting/escaping of the value.
    format!(
        r#"equal("{}", [{}])"#,
        field,
        serde_json::Value::String(value.to_string())
    )
}

fn less_than_query(field: &str, value: &str) -> String {
    format!(
        r#"lessThan("{}", [{}])"#,
        field,
        serde_json::Value::String(value.to_string())
    )
}

#[async_trait]
impl ArticleStore for AppwriteStore {
    async fn count_by_field(&self, field: &str, value: &str, limit: usize) -> Result<usize> {
        let queries = [equal_query(field, value), format!("limit({limit})")];
        let list = self.list(&queries).await?;
        Ok(list.total)
    }

    async fn create(&self, fields: ArticleFields) -> Result<ArticleRecord> {
        let body = serde_json::json!({
            "documentId": "unique()",
            "data": fields,
        });
        let doc = self
            .authed(self.client.post(self.documents_url()).json(&body))
            .send()
            .await
            .context("document create post")?
            .error_for_status()
            .context("document create non-2xx")?
            .json::<Doc>()
            .await
            .context("document create body")?;
        Ok(doc.into())
    }

    async fn list_expired_before(
        &self,
        cutoff: &str,
        page_limit: usize,
    ) -> Result<Vec<ArticleRecord>> {
        let queries = [
            less_than_query("expiresAt", cutoff),
            format!("limit({page_limit})"),
        ];
        let list = self.list(&queries).await?;
        Ok(list.documents.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.authed(
            self.client
                .delete(format!("{}/{}", self.documents_url(), id)),
        )
        .send()
        .await
        .context("document delete")?
        .error_for_status()
        .context("document delete non-2xx")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_strings_escape_values() {
        let q = equal_query("sourceUrl", r#"https://x.example/a?b="c""#);
        assert_eq!(q, r#"equal("sourceUrl", ["https://x.example/a?b=\"c\""])"#);
        let q = less_than_query("expiresAt", "2024-01-31T00:00:00.000Z");
        assert_eq!(q, r#"lessThan("expiresAt", ["2024-01-31T00:00:00.000Z"])"#);
    }

    #[test]
    fn document_payload_deserializes() {
        let body = r#"{
            "total": 1,
            "documents": [{
                "$id": "abc123",
                "$createdAt": "2024-01-01T00:00:00.000Z",
                "title": "t", "summary": "s", "content": "c",
                "imageUrl": "", "sourceUrl": "https://x.example/a",
                "sourceName": "Test Wire",
                "publishedAt": "2024-01-01T00:00:00.000Z",
                "tags": "[\"PLA\"]", "category": "materials",
                "expiresAt": "2024-01-31T00:00:00.000Z"
            }]
        }"#;
        let list: DocList = serde_json::from_str(body).unwrap();
        assert_eq!(list.total, 1);
        let rec: ArticleRecord = list.documents.into_iter().next().unwrap().into();
        assert_eq!(rec.id, "abc123");
        assert_eq!(rec.fields.category, "materials");
        assert!(rec.fields.maker.is_none());
    }
}
