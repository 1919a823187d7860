//! Vector-search backend client.
//!
//! The backend is consumed through the [`SearchIndex`] trait so the
//! pipeline can run against a test double. The production
//! implementation targets a Pinecone-style records API addressed by
//! host, index name, and namespace.

use crate::filter::FilterExpr;
use newschat_core::{AppError, AppResult};
use serde::Deserialize;
use serde_json::json;

/// One raw hit from a similarity search.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    /// Record identifier
    #[serde(rename = "_id")]
    pub id: String,

    /// Similarity score
    #[serde(rename = "_score")]
    pub score: f32,

    /// Stored field bag for the record
    #[serde(default)]
    pub fields: serde_json::Value,
}

/// Trait for vector-search backends.
#[async_trait::async_trait]
pub trait SearchIndex: Send + Sync {
    /// Name of the index being searched.
    fn index_name(&self) -> &str;

    /// Run a top-K similarity search, requesting all stored fields.
    ///
    /// Hit order is the backend's relevance order and must be preserved.
    async fn search(
        &self,
        query: &str,
        filter: &FilterExpr,
        top_k: usize,
    ) -> AppResult<Vec<SearchHit>>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Option<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

/// Pinecone-backed search index.
pub struct PineconeIndex {
    host: String,
    index: String,
    namespace: String,
    api_key: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for PineconeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PineconeIndex")
            .field("host", &self.host)
            .field("index", &self.index)
            .field("namespace", &self.namespace)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl PineconeIndex {
    /// Create a client for one index namespace.
    pub fn new(
        host: impl Into<String>,
        index: impl Into<String>,
        namespace: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            index: index.into(),
            namespace: namespace.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl SearchIndex for PineconeIndex {
    fn index_name(&self) -> &str {
        &self.index
    }

    async fn search(
        &self,
        query: &str,
        filter: &FilterExpr,
        top_k: usize,
    ) -> AppResult<Vec<SearchHit>> {
        let url = format!(
            "{}/records/namespaces/{}/search",
            self.host, self.namespace
        );

        let body = json!({
            "query": {
                "top_k": top_k,
                "inputs": { "text": query },
                "filter": filter.to_backend_value(),
            },
            "fields": ["*"],
        });

        tracing::debug!(index = %self.index, %url, "Searching vector index");

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Retrieval(format!("Search backend unreachable: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Retrieval(format!(
                "Search backend error ({}): {}",
                status, error_text
            )));
        }

        let search_response: SearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::Retrieval(format!("Failed to parse search response: {}", e)))?;

        let hits = search_response
            .result
            .map(|result| result.hits)
            .unwrap_or_default();

        tracing::info!(count = hits.len(), "Search returned hits");

        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_deserializes_wire_names() {
        let json = r#"{"_id": "a1", "_score": 0.92, "fields": {"title": "T"}}"#;
        let hit: SearchHit = serde_json::from_str(json).unwrap();
        assert_eq!(hit.id, "a1");
        assert!((hit.score - 0.92).abs() < f32::EPSILON);
        assert_eq!(hit.fields["title"], "T");
    }

    #[test]
    fn test_response_tolerates_missing_result() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.result.is_none());
    }

    #[test]
    fn test_response_tolerates_missing_hits() {
        let response: SearchResponse = serde_json::from_str(r#"{"result": {}}"#).unwrap();
        assert!(response.result.unwrap().hits.is_empty());
    }

    #[test]
    fn test_index_name() {
        let index = PineconeIndex::new("https://h.example", "news", "articles", "key");
        assert_eq!(index.index_name(), "news");
    }
}
