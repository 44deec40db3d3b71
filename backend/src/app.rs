//! One interactive DocIQ session and the services behind it
use anyhow::{Context, Result};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::dto::IngestionReport;
use crate::application::ports::{DocumentLoader, Embedder, LanguageModel, VectorIndex};
use crate::application::services::{ChatService, EmbeddingService, IngestionError, IngestionService};
use crate::application::use_cases::{AskQuestion, SessionResult, UploadDocument};
use crate::config::AppConfig;
use crate::domain::aggregates::{ChatSession, SessionState};
use crate::domain::entities::ConversationTurn;
use crate::domain::value_objects::SessionId;
use crate::infrastructure::embeddings::{FastEmbedService, QdrantVectorStore};
use crate::infrastructure::llm::OllamaClient;
use crate::infrastructure::parsers::PdfLoader;

/// Snapshot of the session shown by `/status`
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStatus {
    pub state: SessionState,
    pub collection: Option<String>,
    pub points_count: Option<u64>,
    pub last_error: Option<String>,
    pub turns: usize,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State: {}", self.state)?;
        if let Some(collection) = &self.collection {
            write!(f, "\nCollection: {}", collection)?;
            if let Some(points) = self.points_count {
                write!(f, " ({} chunks)", points)?;
            }
        }
        if let Some(error) = &self.last_error {
            write!(f, "\nLast error: {}", error)?;
        }
        write!(f, "\nTurns: {}", self.turns)
    }
}

pub struct DocIqApp {
    session: ChatSession,
    ingestion: IngestionService,
    embedding: EmbeddingService,
    chat: ChatService,
}

impl DocIqApp {
    /// Build the app with the local adapters: pdf-extract, fastembed,
    /// Qdrant and Ollama. Loads the embedding model before returning.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let embedder: Arc<dyn Embedder> = Arc::new(
            FastEmbedService::new(config.embedding_model)
                .await
                .context("Failed to load embedding model")?,
        );
        let store = QdrantVectorStore::new(&config.qdrant_url)?;
        let ollama = OllamaClient::new(config.ollama.clone())?;

        match ollama.has_model().await {
            Ok(true) => {}
            Ok(false) => warn!(
                "Model '{}' is not installed in Ollama; run `ollama pull {}`",
                config.ollama.model, config.ollama.model
            ),
            Err(e) => warn!("Could not list Ollama models: {:#}", e),
        }

        info!(
            "DocIQ ready: embeddings={}, qdrant={}, llm={}",
            config.embedding_model,
            store.url(),
            ollama.model_name()
        );

        Ok(Self::with_components(
            config,
            Arc::new(PdfLoader::new()),
            embedder,
            Arc::new(store),
            Arc::new(ollama),
        ))
    }

    /// Build the app from arbitrary port implementations
    pub fn with_components(
        config: &AppConfig,
        loader: Arc<dyn DocumentLoader>,
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        llm: Arc<dyn LanguageModel>,
    ) -> Self {
        DocIqApp {
            session: ChatSession::new(SessionId::generate()),
            ingestion: IngestionService::from_config(config.ingestion.clone(), loader),
            embedding: EmbeddingService::new(
                config.embedding_service_config(),
                embedder.clone(),
                index.clone(),
            ),
            chat: ChatService::new(config.chat_service_config(), embedder, index, llm),
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn transcript(&self) -> &[ConversationTurn] {
        self.session.transcript()
    }

    /// Transcript as pretty-printed JSON
    pub fn transcript_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self.session.transcript()).context("Failed to serialize transcript")
    }

    /// Ingest uploaded PDF bytes, replacing the active collection
    pub async fn upload(&mut self, bytes: &[u8]) -> SessionResult<IngestionReport> {
        UploadDocument::new(&mut self.session, &self.ingestion, &self.embedding)
            .execute(bytes)
            .await
    }

    /// Read a PDF from disk and ingest it as an upload
    pub async fn upload_file(&mut self, path: &Path) -> SessionResult<IngestionReport> {
        let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => IngestionError::NotFound(path.to_path_buf()),
            _ => IngestionError::FileSystem(e),
        })?;
        self.upload(&bytes).await
    }

    /// Ask a question and return the recorded assistant turn
    pub async fn ask(&mut self, question: &str) -> ConversationTurn {
        AskQuestion::new(&mut self.session, &self.chat)
            .execute(question)
            .await
    }

    pub async fn status(&self) -> SessionStatus {
        let points_count = if self.session.is_ready() {
            match self.embedding.collection_info().await {
                Ok(info) => info.points_count,
                Err(e) => {
                    warn!("Could not read collection info: {}", e);
                    None
                }
            }
        } else {
            None
        };

        SessionStatus {
            state: self.session.state(),
            collection: self.session.active_collection().map(|c| c.to_string()),
            points_count,
            last_error: self.session.last_error().map(str::to_string),
            turns: self.session.transcript().len(),
        }
    }
}
