/// Domain aggregates
use super::base::{DomainError, DomainResult, Entity};
use super::entities::ConversationTurn;
use super::events::{IngestionCompleted, IngestionFailed, IngestionStarted, TurnRecorded};
use super::value_objects::{CollectionName, SessionId};
use std::fmt;
use std::path::{Path, PathBuf};

/// Lifecycle of a chat session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No document has been ingested yet
    Empty,
    /// A document is being parsed, chunked and stored
    Ingesting,
    /// A collection is available for retrieval
    Ready,
    /// The last ingestion failed; the previous collection is gone
    Failed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::Empty => "empty",
            SessionState::Ingesting => "ingesting",
            SessionState::Ready => "ready",
            SessionState::Failed => "failed",
        };
        write!(f, "{}", label)
    }
}

/// A ChatSession is the aggregate root for one interactive session.
/// It owns the readiness state, the active collection and the transcript.
#[derive(Debug, Clone)]
pub struct ChatSession {
    id: SessionId,
    state: SessionState,
    active_collection: Option<CollectionName>,
    document_path: Option<PathBuf>,
    last_error: Option<String>,
    transcript: Vec<ConversationTurn>,
}

impl ChatSession {
    pub fn new(id: SessionId) -> Self {
        ChatSession {
            id,
            state: SessionState::Empty,
            active_collection: None,
            document_path: None,
            last_error: None,
            transcript: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether questions can be answered from the vector index
    pub fn is_ready(&self) -> bool {
        self.state == SessionState::Ready
    }

    pub fn active_collection(&self) -> Option<&CollectionName> {
        self.active_collection.as_ref()
    }

    pub fn document_path(&self) -> Option<&Path> {
        self.document_path.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn transcript(&self) -> &[ConversationTurn] {
        &self.transcript
    }

    /// Move to `Ingesting`. Re-uploading from `Ready` is allowed; the
    /// previous collection is dropped immediately because re-ingestion
    /// deletes it before writing.
    pub fn begin_ingestion(&mut self, document_path: impl Into<PathBuf>) -> DomainResult<IngestionStarted> {
        if self.state == SessionState::Ingesting {
            return Err(DomainError::InvalidOperation(
                "An ingestion is already in progress".to_string(),
            ));
        }

        let document_path = document_path.into();
        self.state = SessionState::Ingesting;
        self.active_collection = None;
        self.last_error = None;
        self.document_path = Some(document_path.clone());

        Ok(IngestionStarted {
            session_id: self.id.clone(),
            document_path,
        })
    }

    pub fn complete_ingestion(
        &mut self,
        collection: CollectionName,
        chunks_stored: usize,
    ) -> DomainResult<IngestionCompleted> {
        self.ensure_ingesting("complete")?;

        self.state = SessionState::Ready;
        self.active_collection = Some(collection.clone());

        Ok(IngestionCompleted {
            session_id: self.id.clone(),
            collection,
            chunks_stored,
        })
    }

    pub fn fail_ingestion(&mut self, error: impl Into<String>) -> DomainResult<IngestionFailed> {
        self.ensure_ingesting("fail")?;

        let error = error.into();
        self.state = SessionState::Failed;
        self.active_collection = None;
        self.last_error = Some(error.clone());

        Ok(IngestionFailed {
            session_id: self.id.clone(),
            error,
        })
    }

    /// Append a turn to the transcript
    pub fn record_turn(&mut self, turn: ConversationTurn) -> TurnRecorded {
        let role = turn.role();
        self.transcript.push(turn);

        TurnRecorded {
            session_id: self.id.clone(),
            role,
            position: self.transcript.len() - 1,
        }
    }

    fn ensure_ingesting(&self, action: &str) -> DomainResult<()> {
        if self.state != SessionState::Ingesting {
            return Err(DomainError::InvalidOperation(format!(
                "Cannot {} ingestion while session is {}",
                action, self.state
            )));
        }
        Ok(())
    }
}

impl Entity for ChatSession {
    type Id = SessionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Role;

    fn new_session() -> ChatSession {
        ChatSession::new(SessionId::new("session-1").unwrap())
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = new_session();
        assert_eq!(session.state(), SessionState::Empty);
        assert!(!session.is_ready());
        assert!(session.active_collection().is_none());
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn test_successful_ingestion_makes_session_ready() {
        let mut session = new_session();

        let started = session.begin_ingestion("temp.pdf").unwrap();
        assert_eq!(started.document_path, PathBuf::from("temp.pdf"));
        assert_eq!(session.state(), SessionState::Ingesting);
        assert!(!session.is_ready());

        let completed = session
            .complete_ingestion(CollectionName::default(), 4)
            .unwrap();
        assert_eq!(completed.chunks_stored, 4);
        assert!(session.is_ready());
        assert_eq!(session.active_collection().unwrap().as_str(), "vector_db");
        assert_eq!(session.document_path(), Some(Path::new("temp.pdf")));
    }

    #[test]
    fn test_failed_ingestion_is_not_ready() {
        let mut session = new_session();
        session.begin_ingestion("temp.pdf").unwrap();
        session.fail_ingestion("No content extracted from PDF").unwrap();

        assert_eq!(session.state(), SessionState::Failed);
        assert!(!session.is_ready());
        assert!(session.active_collection().is_none());
        assert_eq!(session.last_error(), Some("No content extracted from PDF"));
    }

    #[test]
    fn test_reupload_from_ready_drops_previous_collection() {
        let mut session = new_session();
        session.begin_ingestion("first.pdf").unwrap();
        session.complete_ingestion(CollectionName::default(), 2).unwrap();

        session.begin_ingestion("second.pdf").unwrap();
        assert_eq!(session.state(), SessionState::Ingesting);
        assert!(session.active_collection().is_none());

        session.fail_ingestion("Unable to communicate with Qdrant").unwrap();
        assert!(!session.is_ready());

        // A later upload can recover
        session.begin_ingestion("third.pdf").unwrap();
        session.complete_ingestion(CollectionName::default(), 1).unwrap();
        assert!(session.is_ready());
        assert!(session.last_error().is_none());
    }

    #[test]
    fn test_invalid_transitions() {
        let mut session = new_session();
        assert!(session.complete_ingestion(CollectionName::default(), 1).is_err());
        assert!(session.fail_ingestion("boom").is_err());

        session.begin_ingestion("temp.pdf").unwrap();
        assert!(session.begin_ingestion("temp.pdf").is_err());
    }

    #[test]
    fn test_transcript_is_append_only_in_order() {
        let mut session = new_session();
        let first = session.record_turn(ConversationTurn::user("hello"));
        let second = session.record_turn(ConversationTurn::assistant("hi"));

        assert_eq!(first.position, 0);
        assert_eq!(second.position, 1);
        assert_eq!(second.role, Role::Assistant);
        assert_eq!(session.transcript().len(), 2);
        assert_eq!(session.transcript()[0].content(), "hello");
        assert_eq!(session.transcript()[1].role(), Role::Assistant);
    }
}
