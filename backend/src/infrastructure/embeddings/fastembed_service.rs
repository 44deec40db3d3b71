/// FastEmbed service for local embedding generation
use anyhow::{Context, Result};
use async_trait::async_trait;
use fastembed::{EmbeddingModel as FastEmbedModel, InitOptions, TextEmbedding};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::application::ports::Embedder;
use crate::domain::value_objects::{EmbeddingModel, EmbeddingVector};

/// Service for generating embeddings using fastembed
pub struct FastEmbedService {
    model: Arc<Mutex<TextEmbedding>>,
    model_type: EmbeddingModel,
}

impl FastEmbedService {
    /// Create a new FastEmbed service with the specified model.
    /// Downloads the model on first use.
    pub async fn new(model_type: EmbeddingModel) -> Result<Self> {
        info!("Initializing FastEmbed service with model: {}", model_type);

        let fastembed_model = match model_type {
            EmbeddingModel::BGESmallENV15 => FastEmbedModel::BGESmallENV15,
            EmbeddingModel::BGEBaseENV15 => FastEmbedModel::BGEBaseENV15,
            EmbeddingModel::AllMiniLML6V2 => FastEmbedModel::AllMiniLML6V2,
        };

        let model = TextEmbedding::try_new(
            InitOptions::new(fastembed_model).with_show_download_progress(true),
        )
        .context("Failed to initialize FastEmbed model")?;

        info!("FastEmbed model initialized successfully");

        Ok(FastEmbedService {
            model: Arc::new(Mutex::new(model)),
            model_type,
        })
    }

    /// Create a new FastEmbed service with the default model
    pub async fn new_default() -> Result<Self> {
        Self::new(EmbeddingModel::default()).await
    }

    /// Get the model type being used
    pub fn model_type(&self) -> EmbeddingModel {
        self.model_type
    }

    async fn embed_raw(&self, texts: Vec<String>) -> Result<Vec<EmbeddingVector>> {
        let mut model = self.model.lock().await;
        let embeddings = model
            .embed(texts, None)
            .context("Failed to generate embeddings")?;

        embeddings
            .into_iter()
            .map(|values| {
                EmbeddingVector::new(values)
                    .map_err(|e| anyhow::anyhow!("Invalid embedding vector: {}", e))
            })
            .collect()
    }
}

#[async_trait]
impl Embedder for FastEmbedService {
    async fn embed_documents(&self, texts: Vec<String>) -> Result<Vec<EmbeddingVector>> {
        debug!("Generating embeddings for batch of {} texts", texts.len());

        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let result = self.embed_raw(texts).await?;
        debug!("Generated {} embeddings successfully", result.len());
        Ok(result)
    }

    async fn embed_query(&self, text: &str) -> Result<EmbeddingVector> {
        debug!("Generating query embedding (length: {})", text.len());

        let query = match self.model_type.query_instruction() {
            Some(instruction) => format!("{}{}", instruction, text),
            None => text.to_string(),
        };

        self.embed_raw(vec![query])
            .await?
            .into_iter()
            .next()
            .context("No embedding returned")
    }

    fn dimension_count(&self) -> usize {
        self.model_type.dimension_count()
    }
}
