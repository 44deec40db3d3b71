//! DocIQ: ask questions about a PDF using local embeddings, Qdrant and Ollama
pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod repl;

pub use app::{DocIqApp, SessionStatus};
pub use config::{AppConfig, ConfigError};
