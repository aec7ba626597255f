//! Hosted chat model client (Azure OpenAI chat-completions)

use async_trait::async_trait;
use serde_json::{Value, json};
use shared::error::{AppError, ErrorCode};
use std::time::Duration;

/// Longest provider error body kept in an error
const MAX_ERROR_BODY: usize = 1024;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("chat model returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("chat model unreachable: {0}")]
    Transport(String),
    #[error("chat model request timed out")]
    Timeout,
    #[error("chat model returned no message content")]
    EmptyReply,
    #[error("chat model returned invalid JSON: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else if e.is_decode() {
            LlmError::Decode(e.to_string())
        } else {
            LlmError::Transport(e.to_string())
        }
    }
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        tracing::warn!(error = %e, "Assistant request failed");
        AppError::with_message(ErrorCode::AssistantFailed, e.to_string())
    }
}

/// Single-turn chat completion
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError>;
}

pub struct AzureOpenAiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    deployment: String,
    api_version: String,
}

impl AzureOpenAiClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        deployment: impl Into<String>,
        api_version: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            deployment: deployment.into(),
            api_version: api_version.into(),
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions",
            self.endpoint, self.deployment
        )
    }
}

#[async_trait]
impl LlmClient for AzureOpenAiClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let body = json!({
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user}
            ],
            "temperature": 0.2,
            "max_tokens": 800
        });

        let resp = self
            .http
            .post(self.url())
            .query(&[("api-version", self.api_version.as_str())])
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            let body: String = text.chars().take(MAX_ERROR_BODY).collect();
            return Err(LlmError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let result: Value = serde_json::from_str(&text).map_err(|e| LlmError::Decode(e.to_string()))?;
        result
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .ok_or(LlmError::EmptyReply)
    }
}
