//! Model selection types.
//!
//! The service exposes exactly two answer models: a fast default and a
//! higher-latency reasoning variant, chosen by a per-request flag.

use serde::{Deserialize, Serialize};

/// The closed set of answer models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatModel {
    /// Fast default chat model
    Chat,
    /// Higher-latency reasoning model
    Reasoner,
}

impl ChatModel {
    /// Select the model for a request.
    pub fn select(use_reasoning_model: bool) -> Self {
        if use_reasoning_model {
            Self::Reasoner
        } else {
            Self::Chat
        }
    }

    /// Provider-facing model identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chat => "deepseek-chat",
            Self::Reasoner => "deepseek-reasoner",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_default_model() {
        assert_eq!(ChatModel::select(false), ChatModel::Chat);
        assert_eq!(ChatModel::select(false).as_str(), "deepseek-chat");
    }

    #[test]
    fn test_select_reasoning_model() {
        assert_eq!(ChatModel::select(true), ChatModel::Reasoner);
        assert_eq!(ChatModel::select(true).as_str(), "deepseek-reasoner");
    }
}
