/// Ollama chat client for answer generation
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::application::ports::LanguageModel;

/// Connection and sampling settings for Ollama
#[derive(Debug, Clone, PartialEq)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        OllamaConfig {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3".to_string(),
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

/// Client for the Ollama HTTP API. Requests have no timeout.
pub struct OllamaClient {
    config: OllamaConfig,
    client: Client,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(OllamaClient { config, client })
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Names of the models installed on the server
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = self.endpoint("/api/tags");
        debug!("Fetching available models from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to reach Ollama at {}", self.config.base_url))?;

        if !response.status().is_success() {
            bail!("Ollama returned {} for {}", response.status(), url);
        }

        let tags: TagsResponse = response
            .json()
            .await
            .context("Failed to parse Ollama model list")?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Whether the configured model is installed. An untagged name such as
    /// `llama3` matches any tag of that model.
    pub async fn has_model(&self) -> Result<bool> {
        let wanted = &self.config.model;
        let tagged = format!("{}:", wanted);
        Ok(self
            .list_models()
            .await?
            .iter()
            .any(|name| name == wanted || name.starts_with(&tagged)))
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = self.endpoint("/api/chat");
        debug!(
            "Sending prompt ({} chars) to model {}",
            prompt.len(),
            self.config.model
        );

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
            options: ChatOptions {
                temperature: self.config.temperature,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Failed to reach Ollama at {}", self.config.base_url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            bail!("Ollama returned {}: {}", status, detail);
        }

        let chat: ChatResponse = response
            .json()
            .await
            .context("Failed to parse Ollama response")?;

        let answer = chat
            .message
            .map(|m| m.content)
            .context("Ollama response contained no message")?;

        info!("Model {} answered with {} chars", self.config.model, answer.len());
        Ok(answer)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
