//! Newschat Core Library
//!
//! This crate provides the foundational pieces shared across the
//! newschat service:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management
//! - Domain types (articles, conversations, filters)
//! - The publication catalog

pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use catalog::PublicationCatalog;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use types::{Article, ChatFilters, ChatMessage, DateRange, Role};
