use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LLMConfig;
use crate::core::conversation::Turn;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("response contained no message")]
    EmptyResponse,
}

/// The language-model collaborator: ordered turns in, one reply out.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, turns: &[Turn]) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Turn],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat completions endpoint.
pub struct LLMClient {
    client: Client,
    api_key: String,
    config: LLMConfig,
}

impl LLMClient {
    pub fn new(api_key: String, config: LLMConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    pub async fn chat(&self, turns: &[Turn]) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: turns,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        tracing::info!(
            "[LLMClient] Sending {} turns to {}",
            turns.len(),
            self.config.model
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!("[LLMClient] API returned error status {}: {}", status, body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let chat_response = response.json::<ChatResponse>().await?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyResponse)
    }
}

#[async_trait]
impl ChatBackend for LLMClient {
    async fn complete(&self, turns: &[Turn]) -> Result<String, LlmError> {
        self.chat(turns).await
    }
}
