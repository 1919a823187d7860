//! Context assembly and grounding-prompt construction.
//!
//! Formats retrieved articles into a bounded textual context block,
//! wraps it in the citation-enforcing instruction template, and splices
//! the result into the conversation as a system message immediately
//! before the final user message. Pure string shaping, no network.

use crate::prompts::GROUNDING_PROMPT_TEMPLATE;
use handlebars::Handlebars;
use newschat_core::{AppError, AppResult, Article, ChatMessage, PublicationCatalog};
use std::collections::HashMap;

/// Character budget applied to each article body in the context block.
///
/// Applied independently of any server-side truncation the article may
/// already carry (`is_truncated`).
pub const SOURCE_TEXT_LIMIT: usize = 500;

/// Render the retrieved articles into the context block.
///
/// Each article becomes a fixed-template source entry; entries are
/// joined with a blank line.
pub fn build_context(articles: &[Article], catalog: &PublicationCatalog) -> String {
    articles
        .iter()
        .map(|article| format_source(article, catalog))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Format one article as a source entry.
fn format_source(article: &Article, catalog: &PublicationCatalog) -> String {
    format!(
        "Source:\nPublication: {}\nTitle: {}\nDate: {}\nText: {}",
        catalog.display_name(&article.publication),
        article.title,
        article.publication_date.format("%Y-%m-%d"),
        truncate_chars(&article.text, SOURCE_TEXT_LIMIT),
    )
}

/// Take the first `limit` characters of `text`.
///
/// Operates on `char` boundaries; byte slicing could split a UTF-8
/// sequence. A no-op for shorter text, never pads.
fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Build the grounding instruction prompt around the context block.
pub fn build_grounding_prompt(context: &str, question: &str) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text output; HTML escaping would corrupt quotes in sources
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("grounding", GROUNDING_PROMPT_TEMPLATE)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let mut variables = HashMap::new();
    variables.insert("context", context);
    variables.insert("question", question);

    handlebars
        .render("grounding", &variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render grounding prompt: {}", e)))
}

/// Splice the grounding prompt into the conversation as a system
/// message immediately before the final message.
pub fn splice_grounding_message(messages: &[ChatMessage], prompt: String) -> Vec<ChatMessage> {
    let mut augmented = Vec::with_capacity(messages.len() + 1);

    let split = messages.len().saturating_sub(1);
    augmented.extend_from_slice(&messages[..split]);
    augmented.push(ChatMessage::system(prompt));
    augmented.extend_from_slice(&messages[split..]);

    augmented
}
