//! Fallback provider: DeepSeek through its OpenAI-compatible chat API.
//!
//! Only reached when the primary reports quota exhaustion, so this backend
//! keeps no fallback of its own; its failures end the request. JSON mode is
//! requested via `response_format: {"type": "json_object"}` when the gateway
//! asks for structured output.

use super::{BackendError, ChatBackend, ChatRequest};
use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub struct DeepSeekBackend {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl DeepSeekBackend {
    pub fn new(config: &AnalyzerConfig) -> Result<Self, AnalyzerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| AnalyzerError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.deepseek_api_key.clone(),
            base_url: config.deepseek_base_url.trim_end_matches('/').to_string(),
            model: config.deepseek_model.clone(),
        })
    }
}

#[async_trait]
impl ChatBackend for DeepSeekBackend {
    fn name(&self) -> &'static str {
        "deepseek"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, BackendError> {
        let Some(api_key) = &self.api_key else {
            return Err(BackendError::NotConfigured {
                provider: self.name(),
                hint: "set DEEPSEEK_API_KEY".to_string(),
            });
        };

        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: &request.prompt,
            }],
            temperature: request.temperature,
            response_format: request.json_output.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        debug!(model = %self.model, json = request.json_output, "deepseek request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Http {
                provider: self.name(),
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            if status.as_u16() == 429 {
                return Err(BackendError::RateLimited {
                    provider: self.name(),
                    detail: body_text,
                });
            }
            return Err(BackendError::Api {
                provider: self.name(),
                status: status.as_u16(),
                detail: body_text,
            });
        }

        let parsed: ChatCompletionResponse =
            response.json().await.map_err(|e| BackendError::Http {
                provider: self.name(),
                detail: format!("invalid response body: {e}"),
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(BackendError::EmptyResponse {
                provider: self.name(),
            })
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}
