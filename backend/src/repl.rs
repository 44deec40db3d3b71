//! Line-oriented chat shell
use anyhow::Result;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::app::DocIqApp;
use crate::application::use_cases::UPLOAD_SUCCESS_MESSAGE;
use crate::domain::value_objects::Role;

const HELP: &str = "\
Commands:
  /upload <path>   Process a PDF and replace the current index
  /history [json]  Show the conversation so far
  /status          Show session state
  /help            Show this message
  /quit            Exit
Any other input is sent as a question.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Upload(PathBuf),
    History { json: bool },
    Status,
    Help,
    Quit,
    Ask(String),
    Invalid(String),
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }
        if !line.starts_with('/') {
            return Command::Ask(line.to_string());
        }

        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };

        match (name, arg) {
            ("/upload", "") => Command::Invalid("Usage: /upload <path>".to_string()),
            ("/upload", path) => Command::Upload(PathBuf::from(path)),
            ("/history", "") => Command::History { json: false },
            ("/history", "json") => Command::History { json: true },
            ("/history", _) => Command::Invalid("Usage: /history [json]".to_string()),
            ("/status", _) => Command::Status,
            ("/help", _) => Command::Help,
            ("/quit", _) | ("/exit", _) => Command::Quit,
            _ => Command::Invalid(format!("Unknown command: {} (try /help)", name)),
        }
    }
}

/// Upload a file and render the outcome as a single status line
pub async fn upload_status(app: &mut DocIqApp, path: &std::path::Path) -> String {
    match app.upload_file(path).await {
        Ok(_) => UPLOAD_SUCCESS_MESSAGE.to_string(),
        Err(e) => format!("Error: {}", e),
    }
}

/// Run the shell until `/quit` or end of input
pub async fn run<R, W>(app: &mut DocIqApp, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    writer.write_all(b"> ").await?;
    writer.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let command = Command::parse(&line);
        debug!("Command: {:?}", command);

        let output = match command {
            Command::Empty => None,
            Command::Quit => break,
            Command::Help => Some(HELP.to_string()),
            Command::Invalid(message) => Some(message),
            Command::Upload(path) => Some(upload_status(app, &path).await),
            Command::Status => Some(app.status().await.to_string()),
            Command::History { json: true } => Some(app.transcript_json()?),
            Command::History { json: false } => Some(render_history(app)),
            Command::Ask(question) => Some(app.ask(&question).await.content().to_string()),
        };

        if let Some(output) = output {
            writer.write_all(output.as_bytes()).await?;
            writer.write_all(b"\n").await?;
        }
        writer.write_all(b"> ").await?;
        writer.flush().await?;
    }

    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

fn render_history(app: &DocIqApp) -> String {
    if app.transcript().is_empty() {
        return "No messages yet.".to_string();
    }

    app.transcript()
        .iter()
        .map(|turn| {
            let speaker = match turn.role() {
                Role::User => "You",
                Role::Assistant => "Assistant",
            };
            format!(
                "[{}] {}: {}",
                turn.timestamp().format("%H:%M:%S"),
                speaker,
                turn.content()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::{CollectionInfo, RetrievedChunk};
    use crate::application::ports::{DocumentLoader, Embedder, LanguageModel, VectorIndex};
    use crate::application::use_cases::GUIDANCE_MESSAGE;
    use crate::config::AppConfig;
    use crate::domain::entities::Chunk;
    use crate::domain::value_objects::{CollectionName, EmbeddingVector};
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;

    struct StaticLoader;

    #[async_trait]
    impl DocumentLoader for StaticLoader {
        async fn load(&self, _path: &Path) -> Result<String> {
            Ok("Rust guarantees memory safety through ownership.".to_string())
        }
    }

    struct UnitEmbedder;

    #[async_trait]
    impl Embedder for UnitEmbedder {
        async fn embed_documents(&self, texts: Vec<String>) -> Result<Vec<EmbeddingVector>> {
            texts
                .iter()
                .map(|_| EmbeddingVector::new(vec![1.0, 0.0]).map_err(anyhow::Error::from))
                .collect()
        }

        async fn embed_query(&self, _text: &str) -> Result<EmbeddingVector> {
            Ok(EmbeddingVector::new(vec![1.0, 0.0])?)
        }

        fn dimension_count(&self) -> usize {
            2
        }
    }

    struct NullIndex;

    #[async_trait]
    impl VectorIndex for NullIndex {
        async fn list_collections(&self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        async fn create_collection(&self, _c: &CollectionName, _d: usize) -> Result<()> {
            Ok(())
        }

        async fn delete_collection(&self, _c: &CollectionName) -> Result<()> {
            Ok(())
        }

        async fn upsert_chunks(&self, _c: &CollectionName, _chunks: Vec<(Chunk, EmbeddingVector)>) -> Result<()> {
            Ok(())
        }

        async fn search(&self, _c: &CollectionName, _q: &EmbeddingVector, _limit: u64) -> Result<Vec<RetrievedChunk>> {
            Ok(Vec::new())
        }

        async fn collection_info(&self, c: &CollectionName) -> Result<CollectionInfo> {
            Ok(CollectionInfo {
                name: c.to_string(),
                points_count: Some(1),
            })
        }
    }

    struct EchoModel;

    #[async_trait]
    impl LanguageModel for EchoModel {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Ok("Ownership.".to_string())
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    fn test_app(dir: &TempDir) -> DocIqApp {
        let mut config = AppConfig::default();
        config.ingestion.upload_path = dir.path().join("temp.pdf");
        DocIqApp::with_components(
            &config,
            Arc::new(StaticLoader),
            Arc::new(UnitEmbedder),
            Arc::new(NullIndex),
            Arc::new(EchoModel),
        )
    }

    async fn run_script(app: &mut DocIqApp, script: &str) -> String {
        let mut output = Vec::new();
        run(app, script.as_bytes(), &mut output).await.unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("   "), Command::Empty);
        assert_eq!(
            Command::parse("/upload  docs/book.pdf "),
            Command::Upload(PathBuf::from("docs/book.pdf"))
        );
        assert!(matches!(Command::parse("/upload"), Command::Invalid(_)));
        assert_eq!(Command::parse("/history"), Command::History { json: false });
        assert_eq!(Command::parse("/history json"), Command::History { json: true });
        assert_eq!(
            Command::parse("/history yaml"),
            Command::Invalid("Usage: /history [json]".to_string())
        );
        assert_eq!(Command::parse("/quit"), Command::Quit);
        assert!(matches!(Command::parse("/frobnicate"), Command::Invalid(_)));
        assert_eq!(
            Command::parse("What is borrowing?"),
            Command::Ask("What is borrowing?".to_string())
        );
    }

    #[tokio::test]
    async fn test_question_before_upload_gets_guidance() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        let output = run_script(&mut app, "What is ownership?\n/quit\nignored\n").await;

        assert!(output.contains(GUIDANCE_MESSAGE));
        assert_eq!(app.transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_upload_then_ask() {
        let dir = TempDir::new().unwrap();
        let pdf = dir.path().join("book.pdf");
        tokio::fs::write(&pdf, b"%PDF-1.4").await.unwrap();
        let mut app = test_app(&dir);

        let script = format!("/upload {}\nWhat is ownership?\n/status\n", pdf.display());
        let output = run_script(&mut app, &script).await;

        assert!(output.contains("PDF processed successfully."));
        assert!(output.contains("Ownership."));
        assert!(output.contains("State: ready"));
    }

    #[tokio::test]
    async fn test_upload_missing_file_reports_error() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        let output = run_script(&mut app, "/upload /nonexistent/book.pdf\n").await;

        assert!(output.contains("Error: The file /nonexistent/book.pdf does not exist."));
        assert!(!app.session().is_ready());
    }

    #[tokio::test]
    async fn test_history_lists_turns_in_order() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        let output = run_script(&mut app, "first\nsecond\n/history\n").await;

        let you_first = output.find("You: first").unwrap();
        let you_second = output.find("You: second").unwrap();
        assert!(you_first < you_second);
        assert_eq!(output.matches("Assistant: ").count(), 2);
    }
}
