//! Turns raw splitter output into `Chunk` records with stable ids and
//! positional metadata.

use serde_json::Value;
use tracing::debug;

use crate::split::TextSplitter;
use crate::traits::Splitter;
use crate::types::{Chunk, Document, Metadata};

#[derive(Debug, Clone, Default)]
pub struct DocumentChunker<S = TextSplitter> {
    splitter: S,
}

impl<S: Splitter> DocumentChunker<S> {
    pub fn new(splitter: S) -> Self { Self { splitter } }

    pub fn splitter(&self) -> &S { &self.splitter }

    /// Splits `content` and tags every piece with its document identity.
    ///
    /// Input metadata is copied into each chunk; `chunk_size`, `chunk_index`
    /// and `total_chunks` are written over it.
    pub fn split_document(&self, document_id: &str, content: &str, metadata: &Metadata) -> Vec<Chunk> {
        let pieces = self.splitter.split_text(content);
        let total_chunks = pieces.len();
        debug!(document_id, total_chunks, "split document");
        pieces
            .into_iter()
            .enumerate()
            .map(|(chunk_index, content)| {
                let mut chunk_metadata = metadata.clone();
                chunk_metadata.insert("chunk_size".into(), Value::from(content.chars().count()));
                chunk_metadata.insert("chunk_index".into(), Value::from(chunk_index));
                chunk_metadata.insert("total_chunks".into(), Value::from(total_chunks));
                Chunk {
                    id: Chunk::id_for(document_id, chunk_index),
                    content,
                    metadata: chunk_metadata,
                    document_id: document_id.to_string(),
                    chunk_index,
                }
            })
            .collect()
    }

    pub fn chunk(&self, document: &Document) -> Vec<Chunk> {
        self.split_document(&document.id, &document.content, &document.metadata)
    }
}
