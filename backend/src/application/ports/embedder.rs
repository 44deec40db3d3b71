use anyhow::Result;
use async_trait::async_trait;

use crate::domain::value_objects::EmbeddingVector;

/// Turns text into unit-length embedding vectors.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed document chunks. Returns embeddings in the same order as `texts`.
    async fn embed_documents(&self, texts: Vec<String>) -> Result<Vec<EmbeddingVector>>;

    /// Embed a search query. Models with a query instruction apply it here.
    async fn embed_query(&self, text: &str) -> Result<EmbeddingVector>;

    /// Dimension of every vector this embedder produces
    fn dimension_count(&self) -> usize;
}
