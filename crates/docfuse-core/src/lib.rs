pub mod chunker;
pub mod config;
pub mod data_processor;
pub mod error;
pub mod split;
pub mod traits;
pub mod types;

pub use chunker::DocumentChunker;
pub use error::{Error, Result};
pub use split::{SplitterConfig, SplitterKind, TextSplitter};
