/// Embeddings infrastructure for document retrieval
mod fastembed_service;
mod qdrant_store;
mod text_splitter;

pub use fastembed_service::FastEmbedService;
pub use qdrant_store::QdrantVectorStore;
pub use text_splitter::TextSplitter;
