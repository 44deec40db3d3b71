/// Retrieval-augmented answering over the active collection
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::application::dto::RetrievedChunk;
use crate::application::ports::{Embedder, LanguageModel, VectorIndex};
use crate::domain::value_objects::{CollectionName, PromptTemplate};

/// Returned whenever any step of answering fails
pub const FALLBACK_RESPONSE: &str = "Sorry, I couldn't process your request.";

/// Configuration for the chat service
#[derive(Debug, Clone)]
pub struct ChatServiceConfig {
    /// Collection searched for context
    pub collection_name: CollectionName,
    /// Number of chunks retrieved per question
    pub top_k: u64,
    pub prompt_template: PromptTemplate,
}

impl Default for ChatServiceConfig {
    fn default() -> Self {
        ChatServiceConfig {
            collection_name: CollectionName::default(),
            top_k: 1,
            prompt_template: PromptTemplate::default(),
        }
    }
}

/// Embeds the question, retrieves context and asks the language model
pub struct ChatService {
    config: ChatServiceConfig,
    embedder: Arc<dyn Embedder>,
    vector_index: Arc<dyn VectorIndex>,
    llm: Arc<dyn LanguageModel>,
}

impl ChatService {
    pub fn new(
        config: ChatServiceConfig,
        embedder: Arc<dyn Embedder>,
        vector_index: Arc<dyn VectorIndex>,
        llm: Arc<dyn LanguageModel>,
    ) -> Self {
        ChatService {
            config,
            embedder,
            vector_index,
            llm,
        }
    }

    pub fn config(&self) -> &ChatServiceConfig {
        &self.config
    }

    /// Answer a question. Never fails: errors are logged and replaced by
    /// [`FALLBACK_RESPONSE`].
    pub async fn get_response(&self, question: &str) -> String {
        match self.answer(question).await {
            Ok(answer) => answer,
            Err(e) => {
                error!("Failed to answer question: {:#}", e);
                FALLBACK_RESPONSE.to_string()
            }
        }
    }

    /// Answer a question, surfacing the first error
    pub async fn answer(&self, question: &str) -> Result<String> {
        let context = self.retrieve(question).await?;
        let context_text = context
            .iter()
            .map(|chunk| chunk.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = self.config.prompt_template.fill(&context_text, question);
        debug!("Composed prompt of {} chars", prompt.len());

        self.llm
            .generate(&prompt)
            .await
            .with_context(|| format!("Generation with {} failed", self.llm.model_name()))
    }

    /// Retrieve the chunks closest to the question, best match first
    pub async fn retrieve(&self, question: &str) -> Result<Vec<RetrievedChunk>> {
        let query = self
            .embedder
            .embed_query(question)
            .await
            .context("Failed to generate query embedding")?;

        let results = self
            .vector_index
            .search(&self.config.collection_name, &query, self.config.top_k)
            .await
            .context("Vector search failed")?;

        info!(
            "Retrieved {} chunk(s) from '{}'{}",
            results.len(),
            self.config.collection_name,
            results
                .first()
                .map(|r| format!(" (best score {:.3})", r.score))
                .unwrap_or_default()
        );
        Ok(results)
    }
}
