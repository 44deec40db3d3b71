/// PDF text extraction backed by the pdf-extract crate
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, info};

use crate::application::ports::DocumentLoader;
use crate::infrastructure::parsers::TextNormalizer;

/// Loads a PDF from disk and returns its normalized text
#[derive(Debug, Clone, Copy)]
pub struct PdfLoader {
    normalizer: &'static TextNormalizer,
}

impl PdfLoader {
    pub fn new() -> Self {
        PdfLoader {
            normalizer: TextNormalizer::instance(),
        }
    }

    /// Extract and normalize text from in-memory PDF bytes.
    /// Runs the parser on a blocking thread; a parser panic becomes an error.
    pub async fn extract_from_bytes(&self, bytes: Vec<u8>) -> Result<String> {
        debug!("Extracting text from PDF ({} bytes)", bytes.len());

        let raw = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .context("PDF parser aborted")?
            .map_err(|e| anyhow!("Failed to parse PDF: {}", e))?;

        Ok(self.normalizer.normalize(&raw))
    }
}

impl Default for PdfLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentLoader for PdfLoader {
    async fn load(&self, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let text = self.extract_from_bytes(bytes).await?;
        info!(
            "Extracted {} characters from {}",
            text.chars().count(),
            path.display()
        );
        Ok(text)
    }
}
