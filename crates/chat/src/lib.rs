//! Retrieval-augmented chat over a news archive.
//!
//! Turns a conversation plus UI filters into a grounded, streaming
//! answer: the conversation is contextualized into one search query,
//! matching articles are retrieved and formatted into a citation-
//! enforcing prompt, and the answer streams back alongside the source
//! articles used.

pub mod assemble;
pub mod contextualize;
pub mod pipeline;
pub mod prompts;

#[cfg(test)]
pub(crate) mod testing;

pub use assemble::{build_context, build_grounding_prompt, splice_grounding_message, SOURCE_TEXT_LIMIT};
pub use contextualize::contextual_query;
pub use pipeline::{ChatOutcome, ChatPipeline};
