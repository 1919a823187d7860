//! Vector-search integration crate for the newschat service.
//!
//! Compiles UI filter state into the backend's filter expression shape,
//! runs top-K similarity searches, and normalizes raw hits into article
//! records. The backend itself is opaque; this crate only shapes
//! queries and results around it.

pub mod client;
pub mod filter;
pub mod retriever;

// Re-export main types
pub use client::{PineconeIndex, SearchHit, SearchIndex};
pub use filter::FilterExpr;
pub use retriever::{retrieve_articles, TOP_K};
