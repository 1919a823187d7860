//! DeepSeek LLM provider implementation.
//!
//! Talks to the OpenAI-compatible chat-completions endpoint. The
//! streaming variant consumes server-sent events (`data: {...}` lines
//! terminated by `data: [DONE]`).

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmStream, LlmStreamChunk, LlmUsage};
use futures::StreamExt;
use newschat_core::{AppError, AppResult, ChatMessage};
use serde::{Deserialize, Serialize};

/// Wire request format for the chat-completions endpoint.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Wire response format for non-streaming completions.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    model: String,
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: String,
}

/// Wire format of one streaming event.
#[derive(Debug, Deserialize)]
struct StreamEvent {
    choices: Vec<StreamChoice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// DeepSeek chat-model client.
pub struct DeepSeekClient {
    /// Base URL for the OpenAI-compatible API
    base_url: String,

    /// API key sent as a bearer token
    api_key: String,

    /// HTTP client
    client: reqwest::Client,
}

impl std::fmt::Debug for DeepSeekClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeepSeekClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl DeepSeekClient {
    /// Create a new client against the default DeepSeek endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url("https://api.deepseek.com/v1", api_key)
    }

    /// Create a new client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Convert an [`LlmRequest`] to the wire format.
    fn to_wire_request<'a>(&self, request: &'a LlmRequest, stream: bool) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request
                .json_output
                .then_some(ResponseFormat { kind: "json_object" }),
            stream,
        }
    }

    async fn post_completions(
        &self,
        wire_request: &ChatCompletionRequest<'_>,
    ) -> AppResult<reqwest::Response> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(wire_request)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send request to DeepSeek: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "DeepSeek API error ({}): {}",
                status, error_text
            )));
        }

        Ok(response)
    }
}

/// Parse one server-sent-event line into a stream chunk.
///
/// Returns `None` for keep-alive lines and anything that is not a
/// `data:` event.
fn parse_sse_line(line: &str) -> Option<AppResult<LlmStreamChunk>> {
    let payload = line.strip_prefix("data:")?.trim();

    if payload.is_empty() {
        return None;
    }

    if payload == "[DONE]" {
        return Some(Ok(LlmStreamChunk {
            content: String::new(),
            done: true,
            usage: None,
        }));
    }

    let event: StreamEvent = match serde_json::from_str(payload) {
        Ok(event) => event,
        Err(e) => {
            return Some(Err(AppError::Llm(format!(
                "Failed to parse stream event: {}",
                e
            ))))
        }
    };

    let (content, finished) = event
        .choices
        .first()
        .map(|choice| {
            (
                choice.delta.content.clone().unwrap_or_default(),
                choice.finish_reason.is_some(),
            )
        })
        .unwrap_or_default();

    Some(Ok(LlmStreamChunk {
        content,
        done: finished,
        usage: event
            .usage
            .map(|u| LlmUsage::new(u.prompt_tokens, u.completion_tokens)),
    }))
}

#[async_trait::async_trait]
impl LlmClient for DeepSeekClient {
    fn provider_name(&self) -> &str {
        "deepseek"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!(model = %request.model, "Sending completion request to DeepSeek");
        tracing::debug!("Request: {:?}", request);

        let wire_request = self.to_wire_request(request, false);
        let response = self.post_completions(&wire_request).await?;

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse DeepSeek response: {}", e)))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AppError::Llm("DeepSeek response contained no choices".to_string()))?;

        tracing::info!("Received completion from DeepSeek");

        Ok(LlmResponse {
            content,
            model: completion.model,
            usage: completion
                .usage
                .map(|u| LlmUsage::new(u.prompt_tokens, u.completion_tokens))
                .unwrap_or_default(),
        })
    }

    async fn stream(&self, request: &LlmRequest) -> AppResult<LlmStream> {
        tracing::info!(model = %request.model, "Starting streaming request to DeepSeek");

        let wire_request = self.to_wire_request(request, true);
        let response = self.post_completions(&wire_request).await?;

        // SSE events can be split across network reads, so lines are
        // reassembled through a carry-over buffer before parsing.
        let stream = response
            .bytes_stream()
            .scan(String::new(), |buffer, result| {
                let chunks = match result {
                    Ok(bytes) => {
                        buffer.push_str(&String::from_utf8_lossy(&bytes));

                        let mut chunks = Vec::new();
                        while let Some(newline) = buffer.find('\n') {
                            let line: String = buffer.drain(..=newline).collect();
                            if let Some(chunk) = parse_sse_line(line.trim_end()) {
                                chunks.push(chunk);
                            }
                        }
                        chunks
                    }
                    Err(e) => vec![Err(AppError::Llm(format!("Stream error: {}", e)))],
                };

                futures::future::ready(Some(futures::stream::iter(chunks)))
            })
            .flatten();

        Ok(Box::pin(stream))
    }
}
