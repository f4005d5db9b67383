use crate::config::LlmConfig;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("{0}")]
    InvalidRequest(&'static str),
    #[error("chat endpoint unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("chat endpoint returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("chat endpoint returned no message content")]
    EmptyResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Body of an OpenAI-compatible `/chat/completions` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat backend seam so the assistant can run against a stub in tests.
pub trait ChatCompletion: Send + Sync {
    fn complete(
        &self,
        request: CompletionRequest,
    ) -> impl Future<Output = Result<String, AssistantError>> + Send;
}

/// Client for LM Studio, Ollama and other servers speaking the OpenAI chat API.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleClient {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

impl OpenAiCompatibleClient {
    pub fn new(config: &LlmConfig) -> Result<Self, AssistantError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            url: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ChatCompletion for OpenAiCompatibleClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, AssistantError> {
        debug!(url = %self.url, model = %request.model, "sending chat completion");

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Status { status, body });
        }

        let body: CompletionResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(AssistantError::EmptyResponse)
    }
}
