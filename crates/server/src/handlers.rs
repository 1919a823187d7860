//! Request handlers.

use crate::encoding::{encode_sources, SOURCES_HEADER};
use crate::error::ApiError;
use crate::state::AppState;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::TryStreamExt;
use newschat_core::{AppError, ChatFilters, ChatMessage};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Body of `POST /api/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,

    #[serde(default)]
    pub filters: ChatFilters,

    #[serde(default, rename = "useReasoningModel")]
    pub use_reasoning_model: bool,
}

/// Answer a conversation with a streamed, source-grounded reply.
///
/// The plain-text answer streams in the body; the articles it is
/// grounded on travel base64-encoded in the `X-Sources` header.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Response, ApiError> {
    let outcome = tokio::time::timeout(
        state.request_budget,
        state.pipeline.run(
            &request.messages,
            &request.filters,
            request.use_reasoning_model,
        ),
    )
    .await
    .map_err(|_| {
        AppError::Timeout(format!(
            "Request exceeded the {}s budget before streaming began",
            state.request_budget.as_secs()
        ))
    })??;

    tracing::info!(
        sources = outcome.sources.len(),
        model = outcome.model.as_str(),
        "Streaming answer"
    );

    let body = Body::from_stream(
        outcome
            .stream
            .map_ok(|chunk| Bytes::from(chunk.content)),
    );

    let mut response = Response::new(body);
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );

    // On encoding failure the header is omitted and the answer still streams.
    match encode_sources(&outcome.sources).map(|encoded| HeaderValue::from_str(&encoded)) {
        Ok(Ok(value)) => {
            response.headers_mut().insert(SOURCES_HEADER, value);
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Sources header value rejected, omitting it");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to encode sources, omitting the header");
        }
    }

    Ok(response)
}

/// Liveness probe.
pub async fn healthz() -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "status": "ok",
        })),
    )
        .into_response()
}
