use anyhow::Result;
use async_trait::async_trait;

use crate::application::dto::{CollectionInfo, RetrievedChunk};
use crate::domain::entities::Chunk;
use crate::domain::value_objects::{CollectionName, EmbeddingVector};

/// A vector index organised into named collections.
///
/// Every method may fail when the index is unreachable; implementations
/// should not retry.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Names of all collections currently in the index
    async fn list_collections(&self) -> Result<Vec<String>>;

    async fn collection_exists(&self, collection: &CollectionName) -> Result<bool> {
        Ok(self
            .list_collections()
            .await?
            .iter()
            .any(|name| name == collection.as_str()))
    }

    /// Create an empty collection using cosine distance
    async fn create_collection(&self, collection: &CollectionName, dimension_count: usize) -> Result<()>;

    async fn delete_collection(&self, collection: &CollectionName) -> Result<()>;

    /// Insert chunks with their embeddings, overwriting points with the same id
    async fn upsert_chunks(
        &self,
        collection: &CollectionName,
        chunks: Vec<(Chunk, EmbeddingVector)>,
    ) -> Result<()>;

    /// Nearest chunks to `query`, best match first
    async fn search(
        &self,
        collection: &CollectionName,
        query: &EmbeddingVector,
        limit: u64,
    ) -> Result<Vec<RetrievedChunk>>;

    async fn collection_info(&self, collection: &CollectionName) -> Result<CollectionInfo>;
}
