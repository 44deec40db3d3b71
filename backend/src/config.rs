//! Application configuration
//!
//! Defaults match a local setup (Qdrant gRPC on 6334, Ollama on 11434).
//! Every value can be overridden by a `DOCIQ_*` environment variable, and a
//! `.env` file in the working directory is loaded first when present.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::application::services::{ChatServiceConfig, EmbeddingServiceConfig, IngestionConfig};
use crate::domain::value_objects::{
    ChunkUnit, ChunkingPolicy, CollectionName, EmbeddingModel, PromptTemplate,
};
use crate::domain::DomainError;
use crate::infrastructure::llm::OllamaConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    Domain(#[from] DomainError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level configuration for a DocIQ process
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub embedding_model: EmbeddingModel,
    pub qdrant_url: String,
    pub collection_name: CollectionName,
    pub chunking: ChunkingPolicy,
    pub batch_size: usize,
    pub ollama: OllamaConfig,
    pub top_k: u64,
    pub ingestion: IngestionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            embedding_model: EmbeddingModel::default(),
            qdrant_url: "http://localhost:6334".to_string(),
            collection_name: CollectionName::default(),
            chunking: ChunkingPolicy::default(),
            batch_size: 32,
            ollama: OllamaConfig::default(),
            top_k: 1,
            ingestion: IngestionConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load `.env` (if any) and apply `DOCIQ_*` overrides to the defaults
    pub fn from_env() -> ConfigResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(model) = lookup("DOCIQ_EMBEDDING_MODEL") {
            config.embedding_model = model.parse()?;
        }
        if let Some(url) = lookup("DOCIQ_QDRANT_URL") {
            config.qdrant_url = url;
        }
        if let Some(name) = lookup("DOCIQ_COLLECTION") {
            config.collection_name = CollectionName::new(name)?;
        }

        let chunk_size = parse_var(&lookup, "DOCIQ_CHUNK_SIZE")?.unwrap_or(config.chunking.size());
        let chunk_overlap =
            parse_var(&lookup, "DOCIQ_CHUNK_OVERLAP")?.unwrap_or(config.chunking.overlap());
        let chunk_unit = match lookup("DOCIQ_CHUNK_UNIT") {
            Some(unit) => unit.parse::<ChunkUnit>()?,
            None => config.chunking.unit(),
        };
        config.chunking = ChunkingPolicy::with_unit(chunk_size, chunk_overlap, chunk_unit)?;

        if let Some(batch_size) = parse_var(&lookup, "DOCIQ_BATCH_SIZE")? {
            if batch_size == 0 {
                return Err(ConfigError::Invalid {
                    key: "DOCIQ_BATCH_SIZE",
                    value: "0".to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }
            config.batch_size = batch_size;
        }

        if let Some(url) = lookup("DOCIQ_OLLAMA_URL") {
            config.ollama.base_url = url;
        }
        if let Some(model) = lookup("DOCIQ_LLM_MODEL") {
            config.ollama.model = model;
        }
        if let Some(temperature) = parse_var::<_, f32>(&lookup, "DOCIQ_LLM_TEMPERATURE")? {
            if !temperature.is_finite() || temperature < 0.0 {
                return Err(ConfigError::Invalid {
                    key: "DOCIQ_LLM_TEMPERATURE",
                    value: temperature.to_string(),
                    reason: "must be a finite, non-negative number".to_string(),
                });
            }
            config.ollama.temperature = temperature;
        }
        if let Some(top_k) = parse_var(&lookup, "DOCIQ_TOP_K")? {
            if top_k == 0 {
                return Err(ConfigError::Invalid {
                    key: "DOCIQ_TOP_K",
                    value: "0".to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }
            config.top_k = top_k;
        }
        if let Some(path) = lookup("DOCIQ_UPLOAD_PATH") {
            config.ingestion.upload_path = PathBuf::from(path);
        }

        Ok(config)
    }

    pub fn embedding_service_config(&self) -> EmbeddingServiceConfig {
        EmbeddingServiceConfig {
            collection_name: self.collection_name.clone(),
            chunking: self.chunking,
            batch_size: self.batch_size,
        }
    }

    pub fn chat_service_config(&self) -> ChatServiceConfig {
        ChatServiceConfig {
            collection_name: self.collection_name.clone(),
            top_k: self.top_k,
            prompt_template: PromptTemplate::default(),
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str) -> ConfigResult<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|value| {
            value.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
                key,
                value: value.clone(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.embedding_model, EmbeddingModel::BGESmallENV15);
        assert_eq!(config.qdrant_url, "http://localhost:6334");
        assert_eq!(config.collection_name.as_str(), "vector_db");
        assert_eq!(config.chunking.size(), 1000);
        assert_eq!(config.chunking.overlap(), 250);
        assert_eq!(config.top_k, 1);
        assert_eq!(config.ollama.model, "llama3");
        assert_eq!(config.ingestion.upload_path, PathBuf::from("temp.pdf"));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DOCIQ_EMBEDDING_MODEL", "all-MiniLM-L6-v2"),
            ("DOCIQ_COLLECTION", "manuals"),
            ("DOCIQ_CHUNK_SIZE", "200"),
            ("DOCIQ_CHUNK_OVERLAP", "40"),
            ("DOCIQ_CHUNK_UNIT", "words"),
            ("DOCIQ_LLM_MODEL", "mistral"),
            ("DOCIQ_LLM_TEMPERATURE", "0.2"),
            ("DOCIQ_UPLOAD_PATH", "/tmp/dociq/upload.pdf"),
        ]))
        .unwrap();

        assert_eq!(config.embedding_model, EmbeddingModel::AllMiniLML6V2);
        assert_eq!(config.collection_name.as_str(), "manuals");
        assert_eq!(config.chunking.size(), 200);
        assert_eq!(config.chunking.overlap(), 40);
        assert_eq!(config.chunking.unit(), ChunkUnit::Words);
        assert_eq!(config.ollama.model, "mistral");
        assert_eq!(config.ollama.temperature, 0.2);
        assert_eq!(config.ingestion.upload_path, PathBuf::from("/tmp/dociq/upload.pdf"));

        let chat = config.chat_service_config();
        assert_eq!(chat.collection_name.as_str(), "manuals");
        assert_eq!(config.embedding_service_config().chunking.size(), 200);
    }

    #[test]
    fn test_unparsable_number_is_error() {
        let error = AppConfig::from_lookup(lookup_from(&[("DOCIQ_CHUNK_SIZE", "large")])).unwrap_err();
        assert!(matches!(error, ConfigError::Invalid { key: "DOCIQ_CHUNK_SIZE", .. }));
    }

    #[test]
    fn test_overlap_must_be_smaller_than_size() {
        let error = AppConfig::from_lookup(lookup_from(&[
            ("DOCIQ_CHUNK_SIZE", "100"),
            ("DOCIQ_CHUNK_OVERLAP", "100"),
        ]))
        .unwrap_err();
        assert!(matches!(error, ConfigError::Domain(_)));
    }

    #[test]
    fn test_zero_batch_size_is_error() {
        assert!(AppConfig::from_lookup(lookup_from(&[("DOCIQ_BATCH_SIZE", "0")])).is_err());
    }

    #[test]
    fn test_zero_top_k_is_error() {
        let error = AppConfig::from_lookup(lookup_from(&[("DOCIQ_TOP_K", "0")])).unwrap_err();
        assert!(matches!(error, ConfigError::Invalid { key: "DOCIQ_TOP_K", .. }));
    }

    #[test]
    fn test_temperature_must_be_finite_and_non_negative() {
        for value in ["NaN", "inf", "-0.5"] {
            let error = AppConfig::from_lookup(lookup_from(&[("DOCIQ_LLM_TEMPERATURE", value)])).unwrap_err();
            assert!(
                matches!(error, ConfigError::Invalid { key: "DOCIQ_LLM_TEMPERATURE", .. }),
                "{} should be rejected",
                value
            );
        }

        let config = AppConfig::from_lookup(lookup_from(&[("DOCIQ_LLM_TEMPERATURE", "0")])).unwrap();
        assert_eq!(config.ollama.temperature, 0.0);
    }

    #[test]
    #[serial]
    fn test_from_env_reads_process_environment() {
        env::set_var("DOCIQ_COLLECTION", "from_env_test");
        env::set_var("DOCIQ_TOP_K", "3");

        let config = AppConfig::from_env().unwrap();

        env::remove_var("DOCIQ_COLLECTION");
        env::remove_var("DOCIQ_TOP_K");

        assert_eq!(config.collection_name.as_str(), "from_env_test");
        assert_eq!(config.top_k, 3);
    }
}
