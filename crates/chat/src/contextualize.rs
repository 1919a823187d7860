//! Query contextualization.
//!
//! Collapses a multi-turn conversation into one self-contained search
//! query. A single-message conversation is used verbatim with no model
//! call; anything longer goes through one auxiliary completion at
//! temperature 0, parsed strictly as `{"query": "..."}`.

use crate::prompts::CONTEXTUAL_QUERY_SYSTEM_PROMPT;
use newschat_core::{AppError, AppResult, ChatMessage};
use newschat_llm::{ChatModel, LlmClient, LlmRequest};
use serde::Deserialize;

/// Expected schema of the auxiliary model's output.
#[derive(Debug, Deserialize)]
struct GeneratedQuery {
    query: String,
}

/// Produce the search query for a conversation.
///
/// # Errors
/// Returns [`AppError::QueryGeneration`] when the auxiliary response is
/// not valid JSON or lacks the `query` key. There is no fallback to the
/// raw last message; malformed model output fails the request.
pub async fn contextual_query(
    llm: &dyn LlmClient,
    messages: &[ChatMessage],
) -> AppResult<String> {
    let [only] = messages else {
        return contextualize_with_model(llm, messages).await;
    };

    tracing::debug!("Single-message conversation, using it as the query verbatim");
    Ok(only.content.clone())
}

async fn contextualize_with_model(
    llm: &dyn LlmClient,
    messages: &[ChatMessage],
) -> AppResult<String> {
    let conversation = messages
        .iter()
        .map(|m| format!("{}: {}", m.role, m.content))
        .collect::<Vec<_>>()
        .join("\n");

    let prompt = format!("Conversation history:\n---\n{}\n---", conversation);

    let request = LlmRequest::new(
        vec![
            ChatMessage::system(CONTEXTUAL_QUERY_SYSTEM_PROMPT),
            ChatMessage::user(prompt),
        ],
        ChatModel::Chat.as_str(),
    )
    .with_temperature(0.0)
    .with_json_output();

    tracing::info!(
        turns = messages.len(),
        "Generating contextual query from conversation history"
    );

    let response = llm.complete(&request).await?;
    let query = extract_query(&response.content)?;

    tracing::debug!(%query, "Contextual query generated");

    Ok(query)
}

/// Parse the auxiliary model output: optional fenced code-block strip,
/// then strict JSON parse against `{query: string}`.
fn extract_query(raw: &str) -> AppResult<String> {
    let payload = strip_code_fence(raw);

    let parsed: GeneratedQuery = serde_json::from_str(payload).map_err(|e| {
        AppError::QueryGeneration(format!(
            "Auxiliary model output is not a valid query object: {}",
            e
        ))
    })?;

    Ok(parsed.query)
}

/// Extract the contents of a ``` fence (with optional `json` info
/// string), wherever it sits in the output; models sometimes wrap the
/// JSON in prose. Without a fence the trimmed input is returned.
fn strip_code_fence(raw: &str) -> &str {
    let Some(start) = raw.find("```") else {
        return raw.trim();
    };

    let rest = &raw[start + 3..];
    let rest = rest.strip_prefix("json").unwrap_or(rest);

    let rest = match rest.find("```") {
        Some(end) => &rest[..end],
        None => rest,
    };

    rest.trim()
}
