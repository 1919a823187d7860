//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use newschat_core::AppError;
use serde_json::json;

/// Wrapper giving pipeline errors an HTTP shape.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            AppError::RequestDecode(_) => StatusCode::BAD_REQUEST,
            AppError::QueryGeneration(_) | AppError::Retrieval(_) | AppError::Llm(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.0.to_string();

        if status.is_server_error() {
            tracing::error!(%status, error = %message, "Request failed");
        } else {
            tracing::warn!(%status, error = %message, "Request rejected");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}
