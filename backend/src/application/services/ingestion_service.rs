/// Document ingestion: store the upload and extract its text
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::application::ports::DocumentLoader;
use crate::domain::entities::Document;
use crate::infrastructure::file_system::UploadStore;

#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("The file {} does not exist.", .0.display())]
    NotFound(PathBuf),

    #[error("Text extraction failed: {0}")]
    Extraction(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),
}

pub type IngestionResult<T> = Result<T, IngestionError>;

/// Configuration for the ingestion service
#[derive(Debug, Clone)]
pub struct IngestionConfig {
    /// Fixed path each upload is written to, overwriting the previous one
    pub upload_path: PathBuf,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        IngestionConfig {
            upload_path: PathBuf::from("temp.pdf"),
        }
    }
}

/// Service that writes uploads to disk and extracts their text
pub struct IngestionService {
    loader: Arc<dyn DocumentLoader>,
    upload_store: UploadStore,
}

impl IngestionService {
    pub fn new(loader: Arc<dyn DocumentLoader>, upload_store: UploadStore) -> Self {
        IngestionService {
            loader,
            upload_store,
        }
    }

    pub fn from_config(config: IngestionConfig, loader: Arc<dyn DocumentLoader>) -> Self {
        Self::new(loader, UploadStore::new(config.upload_path))
    }

    pub fn upload_store(&self) -> &UploadStore {
        &self.upload_store
    }

    /// Save uploaded bytes to the temporary path, then extract them
    pub async fn ingest_upload(&self, bytes: &[u8]) -> IngestionResult<Document> {
        let path = self.upload_store.save(bytes).await?;
        self.ingest_path(&path).await
    }

    /// Extract the text of the document at `path`
    pub async fn ingest_path(&self, path: &Path) -> IngestionResult<Document> {
        if !tokio::fs::try_exists(path).await? {
            return Err(IngestionError::NotFound(path.to_path_buf()));
        }

        let text = self.loader.load(path).await.map_err(|e| {
            warn!("Failed to extract {}: {:#}", path.display(), e);
            IngestionError::Extraction(format!("{:#}", e))
        })?;

        if text.trim().is_empty() {
            return Err(IngestionError::Extraction(
                "No content extracted from PDF.".to_string(),
            ));
        }

        let document = Document::new(path, text);
        info!(
            "Ingested {} ({} characters)",
            path.display(),
            document.char_count()
        );
        Ok(document)
    }
}
