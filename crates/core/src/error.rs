//! Error types for the newschat service.
//!
//! This module defines a unified error enum that covers all error
//! categories in the application: request decoding, query generation,
//! retrieval, model transport, encoding, and configuration.

use thiserror::Error;

/// Unified error type for the newschat service.
///
/// All fallible functions in the application return `Result<T, AppError>`.
/// We never panic; errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed inbound request (bad JSON shape, missing fields)
    #[error("Request decode error: {0}")]
    RequestDecode(String),

    /// Auxiliary model produced non-parseable or schema-mismatched output
    #[error("Query generation error: {0}")]
    QueryGeneration(String),

    /// Search backend unreachable or returned an error
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Language model transport or protocol errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Wall-clock budget exhausted before streaming began
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Source list failed to serialize for the response header
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Prompt template rendering errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
