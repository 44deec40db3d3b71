/// Service that splits documents, embeds the chunks and stores them
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::application::dto::{CollectionInfo, IngestionReport};
use crate::application::ports::{Embedder, VectorIndex};
use crate::domain::entities::{Chunk, Document};
use crate::domain::value_objects::{ChunkId, ChunkingPolicy, CollectionName};
use crate::infrastructure::embeddings::TextSplitter;

#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("Failed to create text chunks.")]
    NoChunks,

    #[error("Unable to communicate with Qdrant: {0}")]
    Connectivity(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Embedding storage in Qdrant failed: {0}")]
    Storage(String),
}

pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

/// Configuration for the embedding service
#[derive(Debug, Clone)]
pub struct EmbeddingServiceConfig {
    /// Collection replaced on every ingestion
    pub collection_name: CollectionName,
    /// Chunk size and overlap
    pub chunking: ChunkingPolicy,
    /// Number of chunks embedded and upserted per request
    pub batch_size: usize,
}

impl Default for EmbeddingServiceConfig {
    fn default() -> Self {
        EmbeddingServiceConfig {
            collection_name: CollectionName::default(),
            chunking: ChunkingPolicy::default(),
            batch_size: 32,
        }
    }
}

/// Service that orchestrates chunking, embedding generation and storage
pub struct EmbeddingService {
    config: EmbeddingServiceConfig,
    embedder: Arc<dyn Embedder>,
    vector_index: Arc<dyn VectorIndex>,
    splitter: TextSplitter,
}

impl EmbeddingService {
    pub fn new(
        config: EmbeddingServiceConfig,
        embedder: Arc<dyn Embedder>,
        vector_index: Arc<dyn VectorIndex>,
    ) -> Self {
        let splitter = TextSplitter::new(config.chunking);
        EmbeddingService {
            config,
            embedder,
            vector_index,
            splitter,
        }
    }

    pub fn collection_name(&self) -> &CollectionName {
        &self.config.collection_name
    }

    /// Replace the collection with the chunks of `document`.
    ///
    /// Any existing collection with the configured name is deleted first, so
    /// the index only ever reflects the most recently ingested document.
    pub async fn create_embeddings(&self, document: &Document) -> EmbeddingResult<IngestionReport> {
        let collection = &self.config.collection_name;
        info!(
            "Embedding {} into collection '{}'",
            document.path().display(),
            collection
        );

        let chunks = self.split_document(document);
        if chunks.is_empty() {
            return Err(EmbeddingError::NoChunks);
        }
        let chunks_created = chunks.len();

        let replaced_existing = self.clear_collection().await?;

        self.vector_index
            .create_collection(collection, self.embedder.dimension_count())
            .await
            .map_err(|e| EmbeddingError::Storage(format!("{:#}", e)))?;

        let chunks_stored = match self.store_chunks(chunks).await {
            Ok(stored) => stored,
            Err(e) => {
                // Leave no half-written collection behind
                if let Err(cleanup) = self.vector_index.delete_collection(collection).await {
                    warn!("Failed to remove partial collection '{}': {:#}", collection, cleanup);
                }
                return Err(e);
            }
        };

        info!(
            "Completed embedding '{}': {} chunks created, {} stored",
            document.source_name(),
            chunks_created,
            chunks_stored
        );

        Ok(IngestionReport {
            document_path: document.path().to_path_buf(),
            collection: collection.clone(),
            chunks_created,
            chunks_stored,
            replaced_existing,
        })
    }

    fn split_document(&self, document: &Document) -> Vec<Chunk> {
        let pieces = self.splitter.split(document.text());
        let total = pieces.len();
        let source = document.source_name();

        pieces
            .into_iter()
            .enumerate()
            .map(|(index, text)| Chunk::new(ChunkId::generate(), index, total, text, source.clone()))
            .collect()
    }

    /// Delete the target collection if it exists. Returns whether it existed.
    async fn clear_collection(&self) -> EmbeddingResult<bool> {
        let collection = &self.config.collection_name;

        let exists = self
            .vector_index
            .collection_exists(collection)
            .await
            .map_err(|e| EmbeddingError::Connectivity(format!("{:#}", e)))?;

        if exists {
            self.vector_index
                .delete_collection(collection)
                .await
                .map_err(|e| EmbeddingError::Connectivity(format!("{:#}", e)))?;
            info!("Deleted previous collection '{}'", collection);
        }

        Ok(exists)
    }

    /// Embed and upsert chunks in batches; returns the number stored
    async fn store_chunks(&self, chunks: Vec<Chunk>) -> EmbeddingResult<usize> {
        let batch_size = self.config.batch_size.max(1);
        let mut stored = 0;

        for batch in chunks.chunks(batch_size) {
            debug!("Processing batch of {} chunks", batch.len());

            let texts: Vec<String> = batch.iter().map(|c| c.text().to_string()).collect();
            let embeddings = self
                .embedder
                .embed_documents(texts)
                .await
                .map_err(|e| EmbeddingError::Embedding(format!("{:#}", e)))?;

            if embeddings.len() != batch.len() {
                return Err(EmbeddingError::Embedding(format!(
                    "expected {} embeddings, got {}",
                    batch.len(),
                    embeddings.len()
                )));
            }

            let pairs = batch.iter().cloned().zip(embeddings).collect();
            self.vector_index
                .upsert_chunks(&self.config.collection_name, pairs)
                .await
                .map_err(|e| EmbeddingError::Storage(format!("{:#}", e)))?;

            stored += batch.len();
        }

        Ok(stored)
    }

    /// Get statistics about the active collection
    pub async fn collection_info(&self) -> EmbeddingResult<CollectionInfo> {
        self.vector_index
            .collection_info(&self.config.collection_name)
            .await
            .map_err(|e| EmbeddingError::Connectivity(format!("{:#}", e)))
    }
}
