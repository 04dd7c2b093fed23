use std::sync::RwLock;

use anyhow::{anyhow, bail, Result};
use tracing::debug;

use docfuse_core::traits::VectorIndexer;
use docfuse_core::types::{Chunk, ScoredDocument};

struct Entry {
    chunk: Chunk,
    vector: Vec<f32>,
}

/// Brute-force cosine index held in memory.
#[derive(Default)]
pub struct MemoryVectorIndex {
    entries: RwLock<Vec<Entry>>,
}

impl MemoryVectorIndex {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.entries.read().map(|e| e.len()).unwrap_or(0) }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 { 0.0 } else { dot / (na * nb) }
}

impl VectorIndexer for MemoryVectorIndex {
    fn index(&self, chunks: &[Chunk], embeddings: &[Vec<f32>]) -> Result<()> {
        if chunks.len() != embeddings.len() {
            bail!("{} chunks but {} embeddings", chunks.len(), embeddings.len());
        }
        let mut entries = self.entries.write().map_err(|_| anyhow!("vector index lock poisoned"))?;
        if let Some(dim) = entries.first().map(|e| e.vector.len()).or_else(|| embeddings.first().map(Vec::len)) {
            if let Some(bad) = embeddings.iter().find(|v| v.len() != dim) {
                bail!("embedding dimension {} does not match index dimension {dim}", bad.len());
            }
        }
        for (chunk, vector) in chunks.iter().zip(embeddings) {
            entries.retain(|e| e.chunk.id != chunk.id);
            entries.push(Entry { chunk: chunk.clone(), vector: vector.clone() });
        }
        debug!(chunks = chunks.len(), total = entries.len(), "indexed vectors");
        Ok(())
    }

    fn delete_document(&self, document_id: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| anyhow!("vector index lock poisoned"))?;
        entries.retain(|e| e.chunk.document_id != document_id);
        Ok(())
    }

    fn search_vec(&self, query_vec: &[f32], k: usize) -> Result<Vec<ScoredDocument>> {
        let entries = self.entries.read().map_err(|_| anyhow!("vector index lock poisoned"))?;
        let mut scored: Vec<(f32, &Entry)> = entries.iter().map(|e| (cosine(query_vec, &e.vector), e)).collect();
        // Stable: equal similarity keeps insertion order.
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        Ok(scored
            .into_iter()
            .take(k)
            .enumerate()
            .map(|(rank, (score, e))| ScoredDocument::from_chunk(&e.chunk, rank, score))
            .collect())
    }
}
