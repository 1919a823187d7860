//! Retrieval and hit normalization.
//!
//! Issues the compiled query against the search backend and normalizes
//! raw hits into [`Article`] records. Backend order is preserved; it is
//! the relevance order exposed to the caller.

use crate::client::{SearchHit, SearchIndex};
use crate::filter::FilterExpr;
use newschat_core::{AppError, AppResult, Article};
use serde_json::Value;

/// Number of hits requested from the backend per search.
pub const TOP_K: usize = 15;

/// Run a top-K search and normalize the hits into articles.
///
/// Hits with an empty field bag are dropped. A non-empty hit that does
/// not bind to an [`Article`] (for example, a missing publication date)
/// is a retrieval error; invalid values must not flow into prompt
/// assembly.
pub async fn retrieve_articles(
    index: &dyn SearchIndex,
    query: &str,
    filter: &FilterExpr,
) -> AppResult<Vec<Article>> {
    tracing::info!(index = index.index_name(), %query, "Retrieving articles");

    let hits = index.search(query, filter, TOP_K).await?;

    let mut articles = Vec::with_capacity(hits.len());
    for hit in hits {
        if let Some(article) = normalize_hit(hit)? {
            articles.push(article);
        }
    }

    tracing::info!(count = articles.len(), "Normalized retrieval results");

    Ok(articles)
}

/// Merge a hit's field bag with its identifier and score, binding the
/// result to an [`Article`]. Returns `Ok(None)` for empty hits.
fn normalize_hit(hit: SearchHit) -> AppResult<Option<Article>> {
    let mut fields = match hit.fields {
        Value::Object(fields) if !fields.is_empty() => fields,
        Value::Object(_) | Value::Null => return Ok(None),
        other => {
            return Err(AppError::Retrieval(format!(
                "Hit '{}' has a non-object field bag: {}",
                hit.id, other
            )))
        }
    };

    fields.insert("id".to_string(), Value::String(hit.id.clone()));
    fields.insert("score".to_string(), serde_json::json!(hit.score));

    let article: Article = serde_json::from_value(Value::Object(fields)).map_err(|e| {
        AppError::Retrieval(format!("Hit '{}' is not a valid article: {}", hit.id, e))
    })?;

    Ok(Some(article))
}
