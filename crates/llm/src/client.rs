//! LLM client abstraction and request/response types.
//!
//! This module defines the core abstractions for talking to chat-model
//! providers. Requests carry an ordered message list; providers expose
//! both a non-streaming completion (used by the query contextualizer)
//! and a streaming completion (used for the final answer).

use futures::Stream;
use newschat_core::{AppResult, ChatMessage};
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// Chat completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    /// Ordered conversation messages
    pub messages: Vec<ChatMessage>,

    /// Model identifier (e.g., "deepseek-chat")
    pub model: String,

    /// Temperature for sampling (0.0 - 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Constrain the provider to emit a JSON object
    #[serde(default)]
    pub json_output: bool,

    /// Enable streaming responses
    #[serde(default)]
    pub stream: bool,
}

impl LlmRequest {
    /// Create a new request with required fields.
    pub fn new(messages: Vec<ChatMessage>, model: impl Into<String>) -> Self {
        Self {
            messages,
            model: model.into(),
            temperature: None,
            max_tokens: None,
            json_output: false,
            stream: false,
        }
    }

    /// Set the temperature for sampling.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Ask the provider for a JSON-object response.
    pub fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }

    /// Enable streaming for this request.
    pub fn with_streaming(mut self) -> Self {
        self.stream = true;
        self
    }
}

/// Chat completion response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    /// The generated text
    pub content: String,

    /// Model that generated the response
    pub model: String,

    /// Usage statistics
    #[serde(default)]
    pub usage: LlmUsage,
}

/// Token usage statistics.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LlmUsage {
    #[serde(default)]
    pub prompt_tokens: u32,

    #[serde(default)]
    pub completion_tokens: u32,

    #[serde(default)]
    pub total_tokens: u32,
}

impl LlmUsage {
    /// Create usage stats from prompt and completion token counts.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// A chunk from a streaming chat completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmStreamChunk {
    /// Incremental text content
    pub content: String,

    /// Whether this is the final chunk
    #[serde(default)]
    pub done: bool,

    /// Usage statistics (only in final chunk, when the provider sends them)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<LlmUsage>,
}

/// Stream of LLM chunks.
pub type LlmStream = Pin<Box<dyn Stream<Item = AppResult<LlmStreamChunk>> + Send>>;

/// Trait for chat-model providers.
///
/// Abstracts the underlying provider behind a unified interface so the
/// pipeline can be driven by test doubles without network access.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Get the provider name (e.g., "deepseek").
    fn provider_name(&self) -> &str;

    /// Perform a non-streaming completion.
    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse>;

    /// Perform a streaming completion.
    ///
    /// Returns a stream of incremental text chunks; the stream simply
    /// ends when the caller drops it.
    async fn stream(&self, request: &LlmRequest) -> AppResult<LlmStream>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use newschat_core::ChatMessage;

    #[test]
    fn test_request_builder() {
        let request = LlmRequest::new(vec![ChatMessage::user("hi")], "deepseek-chat")
            .with_temperature(0.0)
            .with_json_output();

        assert_eq!(request.model, "deepseek-chat");
        assert_eq!(request.temperature, Some(0.0));
        assert!(request.json_output);
        assert!(!request.stream);
    }

    #[test]
    fn test_streaming_flag() {
        let request = LlmRequest::new(vec![], "deepseek-chat").with_streaming();
        assert!(request.stream);
    }
}
