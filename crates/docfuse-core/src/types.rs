//! Domain types shared by the splitters, the stores and the fusion engine.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type ChunkId = String;
pub type Metadata = Map<String, Value>;

/// Plain text extracted from a source file, ready to be chunked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub source_file: Option<String>,
}

/// A retrievable slice of a document.
///
/// - `id`: `<document_id>_chunk_<chunk_index>`, unique per document
/// - `document_id`: identity shared by every chunk of the same document
/// - `chunk_index`: position in emission order, `0..N-1` without gaps
/// - `metadata`: caller metadata plus `chunk_size`, `chunk_index` and `total_chunks`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    pub content: String,
    pub metadata: Metadata,
    pub document_id: String,
    pub chunk_index: usize,
}

impl Chunk {
    pub fn id_for(document_id: &str, chunk_index: usize) -> ChunkId {
        format!("{document_id}_chunk_{chunk_index}")
    }
}

/// One entry of a channel's ranked list.
///
/// `rank` is the zero-based position in that channel's ordering. `score` is
/// whatever the channel reported and is informational only; fusion looks at
/// `rank` alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub id: ChunkId,
    pub content: String,
    #[serde(default)]
    pub metadata: Metadata,
    pub rank: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl ScoredDocument {
    /// Builds a ranked entry from a stored chunk.
    pub fn from_chunk(chunk: &Chunk, rank: usize, score: f32) -> Self {
        Self {
            id: chunk.id.clone(),
            content: chunk.content.clone(),
            metadata: chunk.metadata.clone(),
            rank,
            score: Some(score),
        }
    }
}

/// Output of rank fusion, ordered by `fused_score` descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedResult {
    pub id: ChunkId,
    pub content: String,
    pub metadata: Metadata,
    pub fused_score: f64,
}
