use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dociq::domain::base::Entity;
use dociq::domain::value_objects::CollectionName;
use dociq::{repl, AppConfig, DocIqApp};

#[derive(Parser)]
#[command(name = "dociq")]
#[command(about = "Chat with a PDF using local embeddings, Qdrant and Ollama")]
#[command(version)]
struct Cli {
    /// PDF to process before the session starts
    #[arg(long)]
    pdf: Option<PathBuf>,
    /// Qdrant collection replaced on every upload
    #[arg(long)]
    collection: Option<String>,
    /// Qdrant gRPC endpoint
    #[arg(long)]
    qdrant_url: Option<String>,
    /// Ollama base URL
    #[arg(long)]
    ollama_url: Option<String>,
    /// Ollama model used for answers
    #[arg(long)]
    llm_model: Option<String>,
}

impl Cli {
    fn apply(self, config: &mut AppConfig) -> Result<Option<PathBuf>> {
        if let Some(collection) = self.collection {
            config.collection_name = CollectionName::new(collection)?;
        }
        if let Some(url) = self.qdrant_url {
            config.qdrant_url = url;
        }
        if let Some(url) = self.ollama_url {
            config.ollama.base_url = url;
        }
        if let Some(model) = self.llm_model {
            config.ollama.model = model;
        }
        Ok(self.pdf)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dociq=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env().context("Failed to load configuration")?;
    let pdf = cli.apply(&mut config)?;

    let mut app = DocIqApp::from_config(&config).await?;
    info!("Session {} started", app.session().id());

    if let Some(path) = pdf {
        println!("{}", repl::upload_status(&mut app, &path).await);
    }

    println!("Type a question, or /help for commands.");
    repl::run(
        &mut app,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
}
