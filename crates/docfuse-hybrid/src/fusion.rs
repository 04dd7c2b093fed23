//! Reciprocal-rank fusion of a semantic and a keyword ranking.
//!
//! A document at zero-based rank `r` in a channel earns `1 / (r + 1)` from it.
//! The fused score is `alpha * semantic + (1 - alpha) * keyword`, where a
//! channel that did not return the document contributes 0. Scores reported by
//! the channels themselves are ignored: cosine similarities and BM25 scores
//! are not comparable, positions are.
use std::collections::{HashMap, HashSet};

use docfuse_core::error::{Error, Result};
use docfuse_core::types::{FusedResult, ScoredDocument};

pub const DEFAULT_ALPHA: f64 = 0.5;
pub const DEFAULT_TOP_K: usize = 5;

struct Candidate<'a> {
    doc: &'a ScoredDocument,
    semantic: Option<f64>,
    keyword: Option<f64>,
}

fn reciprocal(rank: usize) -> f64 { 1.0 / (rank as f64 + 1.0) }

fn ranks_are_distinct(docs: &[ScoredDocument]) -> bool {
    let mut ranks: Vec<usize> = docs.iter().map(|d| d.rank).collect();
    ranks.sort_unstable();
    ranks.windows(2).all(|w| w[0] != w[1])
}

fn fused(doc: &ScoredDocument, fused_score: f64) -> FusedResult {
    FusedResult { id: doc.id.clone(), content: doc.content.clone(), metadata: doc.metadata.clone(), fused_score }
}

/// Fuses two ranked lists into at most `top_k` results, best first.
///
/// Ties keep first-seen order, scanning `semantic` before `keyword`. Content and
/// metadata come from the first occurrence of an id; a repeated id within one
/// channel keeps its first rank. When one channel is empty the other is passed
/// through in its own order, scored by its weighted contribution alone.
pub fn fuse(semantic: &[ScoredDocument], keyword: &[ScoredDocument], alpha: f64, top_k: usize) -> Vec<FusedResult> {
    debug_assert!((0.0..=1.0).contains(&alpha), "alpha {alpha} outside [0, 1]");
    debug_assert!(ranks_are_distinct(semantic), "semantic ranks repeat");
    debug_assert!(ranks_are_distinct(keyword), "keyword ranks repeat");

    match (semantic.is_empty(), keyword.is_empty()) {
        (true, true) => return vec![],
        (false, true) => return passthrough(semantic, alpha, top_k),
        (true, false) => return passthrough(keyword, 1.0 - alpha, top_k),
        (false, false) => {}
    }

    let mut candidates: Vec<Candidate> = Vec::with_capacity(semantic.len() + keyword.len());
    let mut by_id: HashMap<&str, usize> = HashMap::new();
    for doc in semantic {
        let slot = *by_id.entry(doc.id.as_str()).or_insert_with(|| {
            candidates.push(Candidate { doc, semantic: None, keyword: None });
            candidates.len() - 1
        });
        candidates[slot].semantic.get_or_insert(reciprocal(doc.rank));
    }
    for doc in keyword {
        let slot = *by_id.entry(doc.id.as_str()).or_insert_with(|| {
            candidates.push(Candidate { doc, semantic: None, keyword: None });
            candidates.len() - 1
        });
        candidates[slot].keyword.get_or_insert(reciprocal(doc.rank));
    }

    let mut results: Vec<FusedResult> = candidates
        .iter()
        .map(|c| fused(c.doc, alpha * c.semantic.unwrap_or(0.0) + (1.0 - alpha) * c.keyword.unwrap_or(0.0)))
        .collect();
    // `sort_by` is stable, so equal scores stay in first-seen order.
    results.sort_by(|a, b| b.fused_score.total_cmp(&a.fused_score));
    results.truncate(top_k);
    results
}

fn passthrough(docs: &[ScoredDocument], weight: f64, top_k: usize) -> Vec<FusedResult> {
    let mut seen: HashSet<&str> = HashSet::new();
    docs.iter()
        .filter(|d| seen.insert(d.id.as_str()))
        .take(top_k)
        .map(|d| fused(d, weight * reciprocal(d.rank)))
        .collect()
}

/// Validated fusion parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankFusion {
    alpha: f64,
    top_k: usize,
}

impl RankFusion {
    pub fn new(alpha: f64, top_k: usize) -> Result<Self> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(Error::InvalidConfig(format!("alpha must be within [0, 1], got {alpha}")));
        }
        if top_k == 0 {
            return Err(Error::InvalidConfig("top_k must be greater than 0".into()));
        }
        Ok(Self { alpha, top_k })
    }

    pub fn alpha(&self) -> f64 { self.alpha }

    pub fn top_k(&self) -> usize { self.top_k }

    pub fn fuse(&self, semantic: &[ScoredDocument], keyword: &[ScoredDocument]) -> Vec<FusedResult> {
        fuse(semantic, keyword, self.alpha, self.top_k)
    }
}

impl Default for RankFusion {
    fn default() -> Self { Self { alpha: DEFAULT_ALPHA, top_k: DEFAULT_TOP_K } }
}
