pub mod ingestion;
pub mod retrieval;

pub use ingestion::IngestionReport;
pub use retrieval::{CollectionInfo, RetrievedChunk};
