use tracing::debug;

use crate::application::services::ChatService;
use crate::domain::{aggregates::ChatSession, entities::ConversationTurn};

/// Answer given while no document is ready
pub const GUIDANCE_MESSAGE: &str = "Please upload a PDF before starting the chat.";

/// Use case for asking a question in a session
///
/// Records the user turn, answers from the active collection (or with the
/// guidance message when the session is not ready) and records the answer.
pub struct AskQuestion<'a> {
    session: &'a mut ChatSession,
    chat: &'a ChatService,
}

impl<'a> AskQuestion<'a> {
    pub fn new(session: &'a mut ChatSession, chat: &'a ChatService) -> Self {
        Self { session, chat }
    }

    /// Returns the assistant turn appended to the transcript
    pub async fn execute(&mut self, question: &str) -> ConversationTurn {
        let recorded = self.session.record_turn(ConversationTurn::user(question));
        debug!("Recorded user turn #{}", recorded.position);

        let response = if self.session.is_ready() {
            self.chat.get_response(question).await
        } else {
            GUIDANCE_MESSAGE.to_string()
        };

        let answer = ConversationTurn::assistant(response);
        let recorded = self.session.record_turn(answer.clone());
        debug!("Recorded assistant turn #{}", recorded.position);

        answer
    }
}
