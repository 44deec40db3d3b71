use std::path::PathBuf;

use crate::domain::value_objects::CollectionName;

/// Outcome of a successful embedding run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionReport {
    pub document_path: PathBuf,
    pub collection: CollectionName,
    pub chunks_created: usize,
    pub chunks_stored: usize,
    /// Whether a previous collection with the same name was deleted first
    pub replaced_existing: bool,
}

impl IngestionReport {
    pub const CONFIRMATION: &'static str = "Vector DB created and stored successfully in Qdrant.";

    pub fn message(&self) -> &'static str {
        Self::CONFIRMATION
    }
}
