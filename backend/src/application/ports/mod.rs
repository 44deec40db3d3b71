//! Interfaces the application layer depends on. Infrastructure provides the
//! production implementations; tests substitute in-memory ones.
pub mod document_loader;
pub mod embedder;
pub mod language_model;
pub mod vector_index;

pub use document_loader::DocumentLoader;
pub use embedder::Embedder;
pub use language_model::LanguageModel;
pub use vector_index::VectorIndex;
