/// Temporary on-disk copy of the uploaded document
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Writes uploads to one fixed path. Every upload overwrites the previous one,
/// so a store must not be shared between concurrent sessions.
#[derive(Debug, Clone)]
pub struct UploadStore {
    path: PathBuf,
}

impl UploadStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        UploadStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the uploaded bytes, creating parent directories as needed
    pub async fn save(&self, bytes: &[u8]) -> Result<PathBuf, std::io::Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        fs::write(&self.path, bytes).await?;
        debug!("Wrote {} bytes to {}", bytes.len(), self.path.display());

        Ok(self.path.clone())
    }
}

impl Default for UploadStore {
    fn default() -> Self {
        UploadStore::new("temp.pdf")
    }
}
