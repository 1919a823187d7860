//! LLM provider implementations.

pub mod deepseek;

pub use deepseek::DeepSeekClient;
