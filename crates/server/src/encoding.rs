//! Source-list header encoding.
//!
//! The articles an answer is grounded on travel in the `X-Sources`
//! response header as base64-wrapped JSON, so the streaming body stays
//! plain text.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use newschat_core::{AppError, AppResult, Article};

/// Name of the response header carrying the source articles.
pub const SOURCES_HEADER: &str = "X-Sources";

/// Encode the source articles for the response header.
pub fn encode_sources(articles: &[Article]) -> AppResult<String> {
    let json = serde_json::to_string(articles)
        .map_err(|e| AppError::Encoding(format!("Failed to serialize sources: {}", e)))?;

    Ok(STANDARD.encode(json))
}

#[cfg(test)]
pub fn decode_sources(encoded: &str) -> AppResult<Vec<Article>> {
    let json = STANDARD
        .decode(encoded)
        .map_err(|e| AppError::Encoding(format!("Invalid base64: {}", e)))?;

    serde_json::from_slice(&json)
        .map_err(|e| AppError::Encoding(format!("Invalid sources payload: {}", e)))
}
