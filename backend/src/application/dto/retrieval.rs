use serde::{Deserialize, Serialize};

/// A chunk returned by a similarity search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub chunk_id: String,
    pub chunk_index: usize,
    pub content: String,
    pub source: String,
    /// Cosine similarity to the query (higher is closer)
    pub score: f32,
}

/// Collection information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionInfo {
    pub name: String,
    pub points_count: Option<u64>,
}
