/// Qdrant vector store for document chunks
use anyhow::{Context, Result};
use async_trait::async_trait;
use qdrant_client::{
    qdrant::{
        CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder,
        UpsertPointsBuilder, Value, VectorParamsBuilder,
    },
    Payload, Qdrant,
};
use serde_json::json;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::application::dto::{CollectionInfo, RetrievedChunk};
use crate::application::ports::VectorIndex;
use crate::domain::base::Entity;
use crate::domain::entities::Chunk;
use crate::domain::value_objects::{CollectionName, EmbeddingVector};

/// Vector index implementation using Qdrant over gRPC
pub struct QdrantVectorStore {
    client: Qdrant,
    url: String,
}

impl QdrantVectorStore {
    /// Create a client for the Qdrant server at `url` (e.g., "http://localhost:6334").
    /// No request is sent until the first operation.
    pub fn new(url: &str) -> Result<Self> {
        info!("Connecting to Qdrant at {}", url);

        let client = Qdrant::from_url(url)
            .build()
            .context("Failed to connect to Qdrant")?;

        Ok(QdrantVectorStore {
            client,
            url: url.to_string(),
        })
    }

    /// Create a store with default local connection
    pub fn new_local() -> Result<Self> {
        Self::new("http://localhost:6334")
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn chunk_payload(chunk: &Chunk) -> Result<Payload> {
    json!({
        "chunk_id": chunk.id().as_str(),
        "chunk_index": chunk.index(),
        "total_chunks": chunk.total(),
        "content": chunk.text(),
        "source": chunk.source(),
        "created_at": chrono::Utc::now().to_rfc3339(),
    })
    .try_into()
    .context("Failed to serialize payload")
}

fn retrieved_chunk(payload: &HashMap<String, Value>, score: f32) -> RetrievedChunk {
    let text = |key: &str| {
        payload
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_default()
    };

    RetrievedChunk {
        chunk_id: text("chunk_id"),
        chunk_index: payload
            .get("chunk_index")
            .and_then(|v| v.as_integer())
            .and_then(|i| usize::try_from(i).ok())
            .unwrap_or_default(),
        content: text("content"),
        source: text("source"),
        score,
    }
}

#[async_trait]
impl VectorIndex for QdrantVectorStore {
    async fn list_collections(&self) -> Result<Vec<String>> {
        let collections = self
            .client
            .list_collections()
            .await
            .context("Failed to list collections")?;

        Ok(collections
            .collections
            .into_iter()
            .map(|c| c.name)
            .collect())
    }

    async fn create_collection(&self, collection: &CollectionName, dimension_count: usize) -> Result<()> {
        self.client
            .create_collection(
                CreateCollectionBuilder::new(collection.as_str()).vectors_config(
                    VectorParamsBuilder::new(dimension_count as u64, Distance::Cosine),
                ),
            )
            .await
            .context("Failed to create collection")?;

        info!(
            "Created collection '{}' with {} dimensions",
            collection, dimension_count
        );
        Ok(())
    }

    async fn delete_collection(&self, collection: &CollectionName) -> Result<()> {
        self.client
            .delete_collection(collection.as_str())
            .await
            .context("Failed to delete collection")?;
        info!("Deleted collection: {}", collection);
        Ok(())
    }

    async fn upsert_chunks(
        &self,
        collection: &CollectionName,
        chunks: Vec<(Chunk, EmbeddingVector)>,
    ) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        debug!("Inserting batch of {} chunks", chunks.len());

        let points = chunks
            .into_iter()
            .map(|(chunk, embedding)| {
                Ok(PointStruct::new(
                    chunk.id().as_str().to_string(),
                    embedding.into_inner(),
                    chunk_payload(&chunk)?,
                ))
            })
            .collect::<Result<Vec<PointStruct>>>()?;

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection.as_str(), points).wait(true))
            .await
            .context("Failed to insert batch")?;

        debug!("Batch insert completed");
        Ok(())
    }

    async fn search(
        &self,
        collection: &CollectionName,
        query: &EmbeddingVector,
        limit: u64,
    ) -> Result<Vec<RetrievedChunk>> {
        debug!("Searching '{}' with limit: {}", collection, limit);

        let search_result = self
            .client
            .search_points(
                SearchPointsBuilder::new(collection.as_str(), query.dimensions().to_vec(), limit)
                    .with_payload(true),
            )
            .await
            .context("Search failed")?;

        let results: Vec<RetrievedChunk> = search_result
            .result
            .iter()
            .map(|point| retrieved_chunk(&point.payload, point.score))
            .collect();

        debug!("Found {} results", results.len());
        Ok(results)
    }

    async fn collection_info(&self, collection: &CollectionName) -> Result<CollectionInfo> {
        let response = self
            .client
            .collection_info(collection.as_str())
            .await
            .context("Failed to get collection info")?;

        Ok(CollectionInfo {
            name: collection.as_str().to_string(),
            points_count: response.result.and_then(|info| info.points_count),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ChunkId;

    #[test]
    fn test_retrieved_chunk_from_payload() {
        let mut payload = HashMap::new();
        payload.insert("chunk_id".to_string(), Value::from("9b2f3c1e-1111-4a4a-8888-000000000001"));
        payload.insert("chunk_index".to_string(), Value::from(3_i64));
        payload.insert("content".to_string(), Value::from("Ownership rules"));
        payload.insert("source".to_string(), Value::from("temp.pdf"));

        let chunk = retrieved_chunk(&payload, 0.87);
        assert_eq!(chunk.chunk_index, 3);
        assert_eq!(chunk.content, "Ownership rules");
        assert_eq!(chunk.source, "temp.pdf");
        assert_eq!(chunk.score, 0.87);
    }

    #[test]
    fn test_retrieved_chunk_tolerates_missing_fields() {
        let chunk = retrieved_chunk(&HashMap::new(), 0.1);
        assert_eq!(chunk.chunk_id, "");
        assert_eq!(chunk.chunk_index, 0);
        assert_eq!(chunk.content, "");
    }

    // The tests below require a running Qdrant instance
    // Run with: docker run -p 6333:6333 -p 6334:6334 qdrant/qdrant

    fn test_collection() -> CollectionName {
        CollectionName::new(format!("test_collection_{}", uuid::Uuid::new_v4().simple())).unwrap()
    }

    fn test_chunk(index: usize, text: &str) -> Chunk {
        Chunk::new(ChunkId::generate(), index, 5, text, "test.pdf")
    }

    #[tokio::test]
    #[ignore] // Requires running Qdrant instance
    async fn test_create_and_delete_collection() {
        let store = QdrantVectorStore::new_local().unwrap();
        let collection = test_collection();

        store.create_collection(&collection, 4).await.unwrap();
        assert!(store.collection_exists(&collection).await.unwrap());
        assert_eq!(
            store.collection_info(&collection).await.unwrap().points_count,
            Some(0)
        );

        store.delete_collection(&collection).await.unwrap();
        assert!(!store.collection_exists(&collection).await.unwrap());
    }

    #[tokio::test]
    #[ignore] // Requires running Qdrant instance
    async fn test_insert_and_search() {
        let store = QdrantVectorStore::new_local().unwrap();
        let collection = test_collection();
        store.create_collection(&collection, 4).await.unwrap();

        let chunks: Vec<(Chunk, EmbeddingVector)> = (0..5)
            .map(|i| {
                let mut values = vec![0.1; 4];
                values[i % 4] = 1.0;
                (
                    test_chunk(i, &format!("Content {}", i)),
                    EmbeddingVector::new(values).unwrap(),
                )
            })
            .collect();
        store.upsert_chunks(&collection, chunks).await.unwrap();

        let info = store.collection_info(&collection).await.unwrap();
        assert_eq!(info.points_count, Some(5));

        let query = EmbeddingVector::new(vec![0.1, 0.1, 1.0, 0.1]).unwrap();
        let results = store.search(&collection, &query, 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk_index, 2);
        assert_eq!(results[0].content, "Content 2");

        let _ = store.delete_collection(&collection).await;
    }
}
