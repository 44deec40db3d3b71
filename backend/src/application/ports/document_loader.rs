use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

/// Extracts plain text from a document on disk.
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Returns the extracted text. An empty string means the document had
    /// no extractable text; callers decide whether that is an error.
    async fn load(&self, path: &Path) -> Result<String>;
}
