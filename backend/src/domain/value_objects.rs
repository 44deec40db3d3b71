/// Value objects for the domain layer
use super::base::{DomainError, DomainResult, ValueObject};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a chat session
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> DomainResult<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(DomainError::InvalidValue("SessionId cannot be empty".to_string()));
        }
        Ok(SessionId(id))
    }

    pub fn generate() -> Self {
        SessionId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for SessionId {}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a chunk, also used as the vector point id.
/// Qdrant only accepts UUIDs or unsigned integers as point ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChunkId(String);

impl ChunkId {
    pub fn new(id: impl Into<String>) -> DomainResult<Self> {
        let id = id.into();
        uuid::Uuid::parse_str(&id)
            .map_err(|_| DomainError::InvalidValue(format!("ChunkId must be a UUID: {}", id)))?;
        Ok(ChunkId(id))
    }

    pub fn generate() -> Self {
        ChunkId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for ChunkId {}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of a collection in the vector index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionName(String);

impl CollectionName {
    pub fn new(name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(DomainError::InvalidValue(
                "Collection name cannot be empty".to_string(),
            ));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(DomainError::InvalidValue(format!(
                "Collection name may only contain ASCII letters, digits, '-' and '_': {}",
                name
            )));
        }
        Ok(CollectionName(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CollectionName {
    fn default() -> Self {
        CollectionName("vector_db".to_string())
    }
}

impl ValueObject for CollectionName {}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Local embedding models available through fastembed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EmbeddingModel {
    /// BAAI/bge-small-en-v1.5
    #[default]
    BGESmallENV15,
    /// BAAI/bge-base-en-v1.5
    BGEBaseENV15,
    /// sentence-transformers/all-MiniLM-L6-v2
    AllMiniLML6V2,
}

impl EmbeddingModel {
    pub fn dimension_count(&self) -> usize {
        match self {
            EmbeddingModel::BGESmallENV15 => 384,
            EmbeddingModel::BGEBaseENV15 => 768,
            EmbeddingModel::AllMiniLML6V2 => 384,
        }
    }

    /// Instruction prepended to queries (never to documents) for retrieval.
    /// BGE English models are trained with it; MiniLM is not.
    pub fn query_instruction(&self) -> Option<&'static str> {
        match self {
            EmbeddingModel::BGESmallENV15 | EmbeddingModel::BGEBaseENV15 => {
                Some("Represent this question for searching relevant passages: ")
            }
            EmbeddingModel::AllMiniLML6V2 => None,
        }
    }

    pub fn model_name(&self) -> &'static str {
        match self {
            EmbeddingModel::BGESmallENV15 => "BAAI/bge-small-en-v1.5",
            EmbeddingModel::BGEBaseENV15 => "BAAI/bge-base-en-v1.5",
            EmbeddingModel::AllMiniLML6V2 => "sentence-transformers/all-MiniLM-L6-v2",
        }
    }
}

impl ValueObject for EmbeddingModel {}

impl fmt::Display for EmbeddingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.model_name())
    }
}

impl FromStr for EmbeddingModel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bge-small-en-v1.5" | "baai/bge-small-en-v1.5" | "bge-small-en" => {
                Ok(EmbeddingModel::BGESmallENV15)
            }
            "bge-base-en-v1.5" | "baai/bge-base-en-v1.5" | "bge-base-en" => {
                Ok(EmbeddingModel::BGEBaseENV15)
            }
            "all-minilm-l6-v2" | "sentence-transformers/all-minilm-l6-v2" => {
                Ok(EmbeddingModel::AllMiniLML6V2)
            }
            other => Err(DomainError::InvalidValue(format!(
                "Unknown embedding model: {}",
                other
            ))),
        }
    }
}

/// A unit-length embedding vector
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingVector(Vec<f32>);

impl EmbeddingVector {
    /// Build an embedding, normalizing it to unit length
    pub fn new(values: Vec<f32>) -> DomainResult<Self> {
        if values.is_empty() {
            return Err(DomainError::InvalidValue(
                "Embedding vector cannot be empty".to_string(),
            ));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(DomainError::InvalidValue(
                "Embedding vector contains non-finite values".to_string(),
            ));
        }

        let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm == 0.0 {
            return Err(DomainError::InvalidValue(
                "Embedding vector cannot be the zero vector".to_string(),
            ));
        }

        Ok(EmbeddingVector(values.into_iter().map(|v| v / norm).collect()))
    }

    pub fn dimensions(&self) -> &[f32] {
        &self.0
    }

    pub fn dimension_count(&self) -> usize {
        self.0.len()
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }

    /// Cosine similarity; for unit vectors this is the dot product
    pub fn cosine_similarity(&self, other: &EmbeddingVector) -> DomainResult<f32> {
        if self.dimension_count() != other.dimension_count() {
            return Err(DomainError::InvalidValue(format!(
                "Dimension mismatch: {} vs {}",
                self.dimension_count(),
                other.dimension_count()
            )));
        }
        Ok(self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum())
    }
}

impl ValueObject for EmbeddingVector {}

/// The unit in which chunk size and overlap are measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChunkUnit {
    #[default]
    Characters,
    Words,
}

impl FromStr for ChunkUnit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "characters" | "chars" => Ok(ChunkUnit::Characters),
            "words" => Ok(ChunkUnit::Words),
            other => Err(DomainError::InvalidValue(format!("Unknown chunk unit: {}", other))),
        }
    }
}

/// Fixed-window chunking parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingPolicy {
    size: usize,
    overlap: usize,
    unit: ChunkUnit,
}

impl ChunkingPolicy {
    pub fn new(size: usize, overlap: usize) -> DomainResult<Self> {
        Self::with_unit(size, overlap, ChunkUnit::Characters)
    }

    pub fn with_unit(size: usize, overlap: usize, unit: ChunkUnit) -> DomainResult<Self> {
        if size == 0 {
            return Err(DomainError::InvalidValue(
                "Chunk size must be greater than zero".to_string(),
            ));
        }
        if overlap >= size {
            return Err(DomainError::InvalidValue(format!(
                "Chunk overlap ({}) must be smaller than chunk size ({})",
                overlap, size
            )));
        }
        Ok(ChunkingPolicy {
            size,
            overlap,
            unit,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    pub fn unit(&self) -> ChunkUnit {
        self.unit
    }

    /// Distance between the starts of consecutive windows
    pub fn step(&self) -> usize {
        self.size - self.overlap
    }

    /// Number of chunks produced for an input of `length` units
    pub fn expected_chunk_count(&self, length: usize) -> usize {
        if length == 0 {
            0
        } else if length <= self.size {
            1
        } else {
            1 + (length - self.size).div_ceil(self.step())
        }
    }
}

impl Default for ChunkingPolicy {
    fn default() -> Self {
        ChunkingPolicy {
            size: 1000,
            overlap: 250,
            unit: ChunkUnit::Characters,
        }
    }
}

impl ValueObject for ChunkingPolicy {}

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl ValueObject for Role {}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// Prompt template with `{context}` and `{question}` placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate(String);

impl PromptTemplate {
    pub const CONTEXT: &'static str = "{context}";
    pub const QUESTION: &'static str = "{question}";

    pub fn new(template: impl Into<String>) -> DomainResult<Self> {
        let template = template.into();
        for placeholder in [Self::CONTEXT, Self::QUESTION] {
            if !template.contains(placeholder) {
                return Err(DomainError::InvalidValue(format!(
                    "Prompt template is missing the {} placeholder",
                    placeholder
                )));
            }
        }
        Ok(PromptTemplate(template))
    }

    /// Fill both placeholders. The context is substituted first so that
    /// a question containing a literal `{context}` is left untouched.
    pub fn fill(&self, context: &str, question: &str) -> String {
        let (head, tail) = match self.0.split_once(Self::QUESTION) {
            Some(parts) => parts,
            None => (self.0.as_str(), ""),
        };
        let mut prompt = head.replace(Self::CONTEXT, context);
        prompt.push_str(question);
        prompt.push_str(&tail.replace(Self::CONTEXT, context));
        prompt
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        PromptTemplate(
            "Use the following pieces of information to answer the user's question.\n\
             If you don't know the answer, just say you don't know.\n\
             \n\
             Context: {context}\n\
             Question: {question}\n\
             \n\
             Helpful answer:"
                .to_string(),
        )
    }
}

impl ValueObject for PromptTemplate {}
