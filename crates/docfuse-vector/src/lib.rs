//! docfuse-vector
//!
//! Semantic channel: a hashing embedder and an in-memory cosine index.
pub mod embed;
pub mod index;

pub use embed::{get_default_embedder, HashingEmbedder};
pub use index::MemoryVectorIndex;
