/// Domain events
use super::base::DomainEvent;
use super::value_objects::{CollectionName, Role, SessionId};
use std::path::PathBuf;

/// Event emitted when a session starts ingesting a document
#[derive(Debug, Clone)]
pub struct IngestionStarted {
    pub session_id: SessionId,
    pub document_path: PathBuf,
}

impl DomainEvent for IngestionStarted {
    fn event_type(&self) -> &'static str {
        "IngestionStarted"
    }

    fn aggregate_id(&self) -> String {
        self.session_id.as_str().to_string()
    }
}

/// Event emitted when a document has been embedded and stored
#[derive(Debug, Clone)]
pub struct IngestionCompleted {
    pub session_id: SessionId,
    pub collection: CollectionName,
    pub chunks_stored: usize,
}

impl DomainEvent for IngestionCompleted {
    fn event_type(&self) -> &'static str {
        "IngestionCompleted"
    }

    fn aggregate_id(&self) -> String {
        self.session_id.as_str().to_string()
    }
}

/// Event emitted when ingestion fails at any step
#[derive(Debug, Clone)]
pub struct IngestionFailed {
    pub session_id: SessionId,
    pub error: String,
}

impl DomainEvent for IngestionFailed {
    fn event_type(&self) -> &'static str {
        "IngestionFailed"
    }

    fn aggregate_id(&self) -> String {
        self.session_id.as_str().to_string()
    }
}

/// Event emitted when a turn is appended to the transcript
#[derive(Debug, Clone)]
pub struct TurnRecorded {
    pub session_id: SessionId,
    pub role: Role,
    pub position: usize,
}

impl DomainEvent for TurnRecorded {
    fn event_type(&self) -> &'static str {
        "TurnRecorded"
    }

    fn aggregate_id(&self) -> String {
        self.session_id.as_str().to_string()
    }
}
