use std::path::Path;

use crate::types::{Chunk, Document, FusedResult, Metadata, ScoredDocument};

/// Turns a text into ordered chunk strings.
pub trait Splitter: Send + Sync {
    fn split_text(&self, text: &str) -> Vec<String>;
}

/// Extracts plain text from one family of source files.
pub trait DocumentProcessor: Send + Sync {
    fn can_process(&self, path: &Path) -> bool;
    fn process(&self, path: &Path, metadata: &Metadata) -> crate::Result<Document>;
}

pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// Keyword channel: full-text index over chunk content.
pub trait TextIndexer: Send + Sync {
    fn index(&self, chunks: &[Chunk]) -> anyhow::Result<()>;
    fn delete_document(&self, document_id: &str) -> anyhow::Result<()>;
    fn search(&self, query: &str, k: usize) -> anyhow::Result<Vec<ScoredDocument>>;
}

/// Semantic channel: nearest-neighbour index over chunk embeddings.
pub trait VectorIndexer: Send + Sync {
    fn index(&self, chunks: &[Chunk], embeddings: &[Vec<f32>]) -> anyhow::Result<()>;
    fn delete_document(&self, document_id: &str) -> anyhow::Result<()>;
    fn search_vec(&self, query_vec: &[f32], k: usize) -> anyhow::Result<Vec<ScoredDocument>>;
}

pub trait SearchEngine: Send + Sync {
    fn index(&self, chunks: &[Chunk]) -> anyhow::Result<()>;
    fn query(&self, query: &str, k: usize) -> anyhow::Result<Vec<FusedResult>>;
}
