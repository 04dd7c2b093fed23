//! docfuse-hybrid
//!
//! Hybrid retrieval: every chunk goes into a keyword channel and a semantic
//! channel; a query asks both for `top_k * over_fetch` candidates and merges
//! the two rankings with reciprocal-rank fusion.
pub mod fusion;

use anyhow::{bail, Result};
use tracing::debug;

use docfuse_core::config::RetrievalSettings;
use docfuse_core::traits::{Embedder, SearchEngine, TextIndexer, VectorIndexer};
use docfuse_core::types::{Chunk, FusedResult};
use docfuse_text::TantivyIndex;
use docfuse_vector::{get_default_embedder, MemoryVectorIndex};

pub use fusion::{fuse, RankFusion};

pub const DEFAULT_OVER_FETCH: usize = 2;

pub struct HybridSearchEngine<TI, VI> where TI: TextIndexer, VI: VectorIndexer {
    text: TI,
    vector: VI,
    embedder: Box<dyn Embedder>,
    fusion: RankFusion,
    over_fetch: usize,
}

impl HybridSearchEngine<TantivyIndex, MemoryVectorIndex> {
    /// RAM-only engine: tantivy keyword index, hashing embedder, cosine index.
    pub fn in_memory(settings: &RetrievalSettings) -> Result<Self> {
        Self::with_settings(TantivyIndex::in_memory()?, MemoryVectorIndex::new(), get_default_embedder(), settings)
    }
}

impl<TI, VI> HybridSearchEngine<TI, VI> where TI: TextIndexer, VI: VectorIndexer {
    pub fn new(text: TI, vector: VI, embedder: Box<dyn Embedder>) -> Self {
        Self { text, vector, embedder, fusion: RankFusion::default(), over_fetch: DEFAULT_OVER_FETCH }
    }

    pub fn with_settings(text: TI, vector: VI, embedder: Box<dyn Embedder>, settings: &RetrievalSettings) -> Result<Self> {
        settings.validate()?;
        let fusion = RankFusion::new(settings.alpha, settings.top_k)?;
        Ok(Self { text, vector, embedder, fusion, over_fetch: settings.over_fetch })
    }

    pub fn fusion(&self) -> &RankFusion { &self.fusion }

    pub fn index(&self, chunks: &[Chunk]) -> Result<()> {
        let batch_texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&batch_texts)?;
        if embeddings.len() != chunks.len() {
            bail!("embedder returned {} vectors for {} chunks", embeddings.len(), chunks.len());
        }
        if let Some(bad) = embeddings.iter().find(|e| e.len() != self.embedder.dim()) {
            bail!("embedding dimension {} does not match embedder dimension {}", bad.len(), self.embedder.dim());
        }
        self.vector.index(chunks, &embeddings)?;
        self.text.index(chunks)
    }

    /// Replaces every chunk of `document_id` in both channels.
    pub fn reindex(&self, document_id: &str, chunks: &[Chunk]) -> Result<()> {
        if let Some(stray) = chunks.iter().find(|c| c.document_id != document_id) {
            bail!("chunk {} belongs to {}, not {document_id}", stray.id, stray.document_id);
        }
        self.vector.delete_document(document_id)?;
        self.text.delete_document(document_id)?;
        self.index(chunks)
    }

    pub fn query(&self, query: &str, k: usize) -> Result<Vec<FusedResult>> {
        if k == 0 { return Ok(vec![]); }
        let candidates = k.saturating_mul(self.over_fetch);
        let q_vec = self.embedder.embed_batch(&[query.to_string()])?.into_iter().next().unwrap_or_default();
        let semantic = self.vector.search_vec(&q_vec, candidates)?;
        let keyword = self.text.search(query, candidates)?;
        let fused = fuse(&semantic, &keyword, self.fusion.alpha(), k);
        debug!(query, semantic = semantic.len(), keyword = keyword.len(), fused = fused.len(), "hybrid query");
        Ok(fused)
    }

    /// Query with the configured `top_k`.
    pub fn search(&self, query: &str) -> Result<Vec<FusedResult>> { self.query(query, self.fusion.top_k()) }
}

/// Concatenates result contents, separated by blank lines, in ranking order.
pub fn build_context(results: &[FusedResult]) -> String {
    results.iter().map(|r| r.content.as_str()).collect::<Vec<_>>().join("\n\n")
}

impl<TI, VI> SearchEngine for HybridSearchEngine<TI, VI> where TI: TextIndexer, VI: VectorIndexer {
    fn index(&self, chunks: &[Chunk]) -> Result<()> { Self::index(self, chunks) }
    fn query(&self, query: &str, k: usize) -> Result<Vec<FusedResult>> { Self::query(self, query, k) }
}
