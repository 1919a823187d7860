//! Test doubles for the pipeline's two collaborators.
//!
//! Both mocks record the requests they receive so tests can assert on
//! call counts and request shapes without any network access.

use futures::StreamExt;
use newschat_core::{AppError, AppResult};
use newschat_index::{FilterExpr, SearchHit, SearchIndex};
use newschat_llm::{LlmClient, LlmRequest, LlmResponse, LlmStream, LlmStreamChunk, LlmUsage};
use std::sync::Mutex;

/// Mock LLM client with canned completion text and stream chunks.
pub(crate) struct MockLlm {
    complete_response: String,
    stream_chunks: Vec<String>,
    complete_requests: Mutex<Vec<LlmRequest>>,
    stream_requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlm {
    pub fn completing(response: &str) -> Self {
        Self {
            complete_response: response.to_string(),
            stream_chunks: vec!["grounded ".to_string(), "answer".to_string()],
            complete_requests: Mutex::new(Vec::new()),
            stream_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_stream_chunks(mut self, chunks: &[&str]) -> Self {
        self.stream_chunks = chunks.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn complete_calls(&self) -> usize {
        self.complete_requests.lock().unwrap().len()
    }

    pub fn last_complete_request(&self) -> Option<LlmRequest> {
        self.complete_requests.lock().unwrap().last().cloned()
    }

    pub fn last_stream_request(&self) -> Option<LlmRequest> {
        self.stream_requests.lock().unwrap().last().cloned()
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlm {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.complete_requests.lock().unwrap().push(request.clone());

        Ok(LlmResponse {
            content: self.complete_response.clone(),
            model: request.model.clone(),
            usage: LlmUsage::default(),
        })
    }

    async fn stream(&self, request: &LlmRequest) -> AppResult<LlmStream> {
        self.stream_requests.lock().unwrap().push(request.clone());

        let chunks: Vec<AppResult<LlmStreamChunk>> = self
            .stream_chunks
            .iter()
            .map(|content| {
                Ok(LlmStreamChunk {
                    content: content.clone(),
                    done: false,
                    usage: None,
                })
            })
            .chain(std::iter::once(Ok(LlmStreamChunk {
                content: String::new(),
                done: true,
                usage: None,
            })))
            .collect();

        Ok(Box::pin(futures::stream::iter(chunks)))
    }
}

/// One recorded search call.
#[derive(Debug, Clone)]
pub(crate) struct RecordedSearch {
    pub query: String,
    pub filter: serde_json::Value,
    pub top_k: usize,
}

/// Mock search index returning canned hits.
pub(crate) struct MockIndex {
    hits: Vec<SearchHit>,
    searches: Mutex<Vec<RecordedSearch>>,
    fail: bool,
}

impl MockIndex {
    pub fn returning(hits: Vec<SearchHit>) -> Self {
        Self {
            hits,
            searches: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            hits: Vec::new(),
            searches: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn last_search(&self) -> Option<RecordedSearch> {
        self.searches.lock().unwrap().last().cloned()
    }

    pub fn search_calls(&self) -> usize {
        self.searches.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl SearchIndex for MockIndex {
    fn index_name(&self) -> &str {
        "mock-index"
    }

    async fn search(
        &self,
        query: &str,
        filter: &FilterExpr,
        top_k: usize,
    ) -> AppResult<Vec<SearchHit>> {
        self.searches.lock().unwrap().push(RecordedSearch {
            query: query.to_string(),
            filter: filter.to_backend_value(),
            top_k,
        });

        if self.fail {
            return Err(AppError::Retrieval("backend unavailable".to_string()));
        }

        Ok(self.hits.clone())
    }
}

/// Collect a chunk stream into the full answer text.
pub(crate) async fn collect_stream(mut stream: LlmStream) -> AppResult<String> {
    let mut answer = String::new();
    while let Some(chunk) = stream.next().await {
        answer.push_str(&chunk?.content);
    }
    Ok(answer)
}
