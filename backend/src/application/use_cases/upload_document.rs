use thiserror::Error;
use tracing::{error, info};

use crate::application::dto::IngestionReport;
use crate::application::services::{
    EmbeddingError, EmbeddingService, IngestionError, IngestionService,
};
use crate::domain::{aggregates::ChatSession, DomainError, DomainEvent};

/// Status line shown after a successful upload
pub const UPLOAD_SUCCESS_MESSAGE: &str = "PDF processed successfully.";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error("Session error: {0}")]
    Domain(#[from] DomainError),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Use case for uploading a document into a session
///
/// Stores the upload, extracts its text, replaces the collection and moves
/// the session to `Ready`. Any failure moves the session to `Failed`.
pub struct UploadDocument<'a> {
    session: &'a mut ChatSession,
    ingestion: &'a IngestionService,
    embedding: &'a EmbeddingService,
}

impl<'a> UploadDocument<'a> {
    pub fn new(
        session: &'a mut ChatSession,
        ingestion: &'a IngestionService,
        embedding: &'a EmbeddingService,
    ) -> Self {
        Self {
            session,
            ingestion,
            embedding,
        }
    }

    pub async fn execute(&mut self, bytes: &[u8]) -> SessionResult<IngestionReport> {
        let started = self
            .session
            .begin_ingestion(self.ingestion.upload_store().path())?;
        info!("{} for session {}", started.event_type(), started.aggregate_id());

        match self.ingest(bytes).await {
            Ok(report) => {
                let completed = self
                    .session
                    .complete_ingestion(report.collection.clone(), report.chunks_stored)?;
                info!(
                    "{}: {} chunks in '{}'",
                    completed.event_type(),
                    completed.chunks_stored,
                    completed.collection
                );
                Ok(report)
            }
            Err(e) => {
                let failed = self.session.fail_ingestion(e.to_string())?;
                error!("{}: {}", failed.event_type(), failed.error);
                Err(e)
            }
        }
    }

    async fn ingest(&self, bytes: &[u8]) -> SessionResult<IngestionReport> {
        let document = self.ingestion.ingest_upload(bytes).await?;
        let report = self.embedding.create_embeddings(&document).await?;
        Ok(report)
    }
}
