pub mod ask_question;
pub mod upload_document;

pub use ask_question::{AskQuestion, GUIDANCE_MESSAGE};
pub use upload_document::{SessionError, SessionResult, UploadDocument, UPLOAD_SUCCESS_MESSAGE};
