pub mod chat_service;
pub mod embedding_service;
pub mod ingestion_service;

pub use chat_service::{ChatService, ChatServiceConfig, FALLBACK_RESPONSE};
pub use embedding_service::{EmbeddingError, EmbeddingResult, EmbeddingService, EmbeddingServiceConfig};
pub use ingestion_service::{IngestionConfig, IngestionError, IngestionResult, IngestionService};
