use std::hash::{Hash, Hasher};

use anyhow::Result;
use twox_hash::XxHash64;

use docfuse_core::traits::Embedder;

pub const DEFAULT_DIM: usize = 256;

/// Deterministic bag-of-words embedder.
///
/// Each lowercased whitespace token is hashed into one of `dim` buckets and the
/// vector is L2-normalised, so texts sharing vocabulary land close together
/// under cosine similarity. No model files needed.
#[derive(Debug, Clone, Copy)]
pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Self { Self { dim: dim.max(1) } }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for token in text.split_whitespace() {
            let token = token.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
            if token.is_empty() { continue; }
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h % self.dim as u64) as usize;
            v[idx] += 1.0 + ((h >> 32) as u32) as f32 / u32::MAX as f32;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v { *x /= norm; }
        }
        v
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self { Self::new(DEFAULT_DIM) }
}

impl Embedder for HashingEmbedder {
    fn dim(&self) -> usize { self.dim }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

pub fn get_default_embedder() -> Box<dyn Embedder> { Box::new(HashingEmbedder::default()) }
