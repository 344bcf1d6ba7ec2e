//! Primary provider: Google Gemini via the `generateContent` REST API.
//!
//! Configured for strict JSON output (`responseMimeType`) and with every
//! safety category set to `BLOCK_NONE` — manifesto analysis routinely trips
//! content filters on political speech, and blocking would fail otherwise
//! valid requests.
//!
//! Quota exhaustion is recognised two ways: HTTP 429, or a structured error
//! body with `status: "RESOURCE_EXHAUSTED"`. Both classify as
//! [`BackendError::RateLimited`], the gateway's fallback trigger.

use super::{BackendError, ChatBackend, ChatRequest};
use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const SAFETY_CATEGORIES: &[&str] = &[
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

pub struct GeminiBackend {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    api_base: String,
}

impl GeminiBackend {
    pub fn new(config: &AnalyzerConfig) -> Result<Self, AnalyzerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| AnalyzerError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
            api_base: API_BASE.to_string(),
        })
    }
}

#[async_trait]
impl ChatBackend for GeminiBackend {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, BackendError> {
        let Some(api_key) = &self.api_key else {
            return Err(BackendError::NotConfigured {
                provider: self.name(),
                hint: "set GEMINI_API_KEY or GOOGLE_API_KEY".to_string(),
            });
        };

        let url = format!(
            "{}/models/{}:generateContent",
            self.api_base, self.model
        );

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: request.prompt.clone(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                response_mime_type: request
                    .json_output
                    .then(|| "application/json".to_string()),
            },
            safety_settings: SAFETY_CATEGORIES
                .iter()
                .map(|category| SafetySetting {
                    category,
                    threshold: "BLOCK_NONE",
                })
                .collect(),
        };

        debug!(model = %self.model, json = request.json_output, "gemini request");

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key.as_str())])
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
            if status.as_u16() == 429 || body_text.contains("RESOURCE_EXHAUSTED") {
                return Err(BackendError::RateLimited {
                    provider: self.name(),
                    detail: truncate(&body_text, 300),
                });
            }
            return Err(BackendError::Api {
                provider: self.name(),
                status: status.as_u16(),
                detail: truncate(&body_text, 300),
            });
        }

        let parsed: GenerateContentResponse =
            response.json().await.map_err(|e| BackendError::Http {
                provider: self.name(),
                detail: format!("invalid response body: {e}"),
            })?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|text| !text.is_empty())
            .ok_or(BackendError::EmptyResponse {
                provider: self.name(),
            })
    }
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_string(),
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}
