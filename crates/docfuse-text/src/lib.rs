//! docfuse-text
//!
//! Keyword channel for hybrid retrieval: chunks indexed in tantivy, searched
//! with a lenient query parser, returned as ranked `ScoredDocument`s.
pub mod tantivy_utils;
pub mod index;

pub use index::TantivyIndex;
