//! Shared server state.

use newschat_chat::ChatPipeline;
use std::time::Duration;

/// State handed to every request handler.
pub struct AppState {
    /// The retrieval-augmented chat pipeline.
    pub pipeline: ChatPipeline,

    /// Wall-clock budget for the pre-stream pipeline phase. Once the
    /// answer stream is open, chunks flow without a deadline.
    pub request_budget: Duration,
}

impl AppState {
    pub fn new(pipeline: ChatPipeline, request_budget: Duration) -> Self {
        Self {
            pipeline,
            request_budget,
        }
    }
}
