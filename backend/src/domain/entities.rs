/// Domain entities
use super::base::Entity;
use super::value_objects::{ChunkId, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A document whose text has been extracted and is ready for chunking
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    text: String,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Document {
            path: path.into(),
            text: text.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the extracted text in characters
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Name shown in chunk metadata (file name, or the full path as a fallback)
    pub fn source_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .map(String::from)
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// A window of document text stored as one point in the vector index
#[derive(Debug, Clone)]
pub struct Chunk {
    id: ChunkId,
    index: usize,
    total: usize,
    text: String,
    source: String,
}

impl Chunk {
    pub fn new(
        id: ChunkId,
        index: usize,
        total: usize,
        text: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Chunk {
            id,
            index,
            total,
            text: text.into(),
            source: source.into(),
        }
    }

    /// Position of the chunk in insertion order
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of chunks the source document was split into
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Entity for Chunk {
    type Id = ChunkId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// One message of the session transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    role: Role,
    content: String,
    timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        ConversationTurn {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_source_name() {
        let document = Document::new("/tmp/uploads/temp.pdf", "hello");
        assert_eq!(document.source_name(), "temp.pdf");
        assert_eq!(document.char_count(), 5);
    }

    #[test]
    fn test_document_char_count_is_unicode_aware() {
        let document = Document::new("notes.pdf", "héllo wörld");
        assert_eq!(document.char_count(), 11);
    }

    #[test]
    fn test_chunk_accessors() {
        let id = ChunkId::generate();
        let chunk = Chunk::new(id.clone(), 2, 5, "some text", "temp.pdf");
        assert_eq!(chunk.id(), &id);
        assert_eq!(chunk.index(), 2);
        assert_eq!(chunk.total(), 5);
        assert_eq!(chunk.text(), "some text");
        assert_eq!(chunk.source(), "temp.pdf");
    }

    #[test]
    fn test_conversation_turn_serializes_role_and_content() {
        let turn = ConversationTurn::user("What is this document about?");
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "What is this document about?");
        assert!(json["timestamp"].is_string());
    }
}
