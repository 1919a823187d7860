//! Shared domain types for the newschat service.
//!
//! These types cross crate boundaries: the HTTP layer decodes them, the
//! pipeline threads them through retrieval and prompt assembly, and the
//! sources header serializes them back out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A retrieved news article.
///
/// Immutable once retrieved; owned by the request scope. `text` may
/// already be truncated server-side (`is_truncated` flags this); the
/// context assembler applies its own character budget independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,

    #[serde(default)]
    pub is_truncated: bool,

    pub publication: String,

    pub publication_date: DateTime<Utc>,

    pub scrape_timestamp: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    pub text: String,

    pub title: String,

    pub url: String,

    /// Similarity score from the search backend, if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

/// Role of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        f.write_str(s)
    }
}

/// One turn of a conversation.
///
/// Conversations are supplied whole on every request; there is no
/// server-side session store. The last message is the one being answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Per-request retrieval filters selected by the caller.
///
/// Never persisted. Publication identifiers are internal names; display
/// names come from the [`crate::catalog::PublicationCatalog`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatFilters {
    #[serde(default)]
    pub publications: Vec<String>,

    #[serde(default, rename = "dateRange", skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

/// An optional-ended date range; either bound may be unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
}
