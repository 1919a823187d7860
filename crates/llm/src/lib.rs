//! LLM integration crate for the newschat service.
//!
//! Provides a provider-agnostic abstraction for chat completions with a
//! unified trait-based interface. Two call shapes are consumed by the
//! pipeline: non-streaming structured completion (query
//! contextualization) and streaming chat completion (the final answer).
//!
//! # Example
//! ```no_run
//! use newschat_core::ChatMessage;
//! use newschat_llm::{DeepSeekClient, LlmClient, LlmRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DeepSeekClient::new("api-key");
//! let request = LlmRequest::new(vec![ChatMessage::user("Hello!")], "deepseek-chat");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmStream, LlmStreamChunk, LlmUsage};
pub use factory::create_client;
pub use providers::DeepSeekClient;
pub use types::ChatModel;
