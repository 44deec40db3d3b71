pub mod dto;
pub mod ports;
pub mod services;
pub mod use_cases;

pub use dto::{CollectionInfo, IngestionReport, RetrievedChunk};
pub use ports::{DocumentLoader, Embedder, LanguageModel, VectorIndex};
pub use services::{
    ChatService, ChatServiceConfig, EmbeddingError, EmbeddingService, EmbeddingServiceConfig,
    IngestionConfig, IngestionError, IngestionService, FALLBACK_RESPONSE,
};
pub use use_cases::{AskQuestion, SessionError, UploadDocument, GUIDANCE_MESSAGE, UPLOAD_SUCCESS_MESSAGE};
