pub mod embeddings;
pub mod file_system;
pub mod llm;
pub mod parsers;
