//! LLM gateway: primary provider with a quota-triggered fallback.
//!
//! Providers sit behind the [`ChatBackend`] trait so the gateway (and the
//! tests) never care which HTTP API is on the other side. The fallback
//! policy is intentionally narrow: only a [`BackendError`] whose
//! [`is_retryable`](BackendError::is_retryable) classification is true —
//! quota/rate-limit exhaustion — triggers the one fallback attempt. Any
//! other primary failure, and any fallback failure, is fatal to the request.
//! No backoff, no circuit breaker; request volume does not justify them.
//!
//! Both JSON paths strip an optional markdown fence before parsing, because
//! models wrap output in ` ```json ` fences despite being told not to.

mod deepseek;
mod gemini;

pub use deepseek::DeepSeekBackend;
pub use gemini::GeminiBackend;

use crate::error::AnalyzerError;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// A single chat completion request as the backends see it.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub prompt: String,
    pub temperature: f32,
    /// Ask the provider for strict JSON output.
    pub json_output: bool,
}

/// One LLM provider. Implementations own their HTTP client and credentials.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Short provider name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Run one completion and return the raw response text.
    async fn complete(&self, request: &ChatRequest) -> Result<String, BackendError>;
}

/// Errors a backend can report, classified for the fallback decision.
#[derive(Debug, Error)]
pub enum BackendError {
    /// No API key was configured for this provider.
    #[error("provider '{provider}' is not configured: {hint}")]
    NotConfigured { provider: &'static str, hint: String },

    /// Quota or rate limit exhausted. The only retryable condition.
    #[error("rate limit exceeded for provider '{provider}': {detail}")]
    RateLimited { provider: &'static str, detail: String },

    /// Transport-level failure (DNS, TLS, timeout).
    #[error("HTTP error from provider '{provider}': {detail}")]
    Http { provider: &'static str, detail: String },

    /// The provider returned a non-success status other than rate limiting.
    #[error("provider '{provider}' returned status {status}: {detail}")]
    Api {
        provider: &'static str,
        status: u16,
        detail: String,
    },

    /// A success response with no usable content.
    #[error("provider '{provider}' returned an empty response")]
    EmptyResponse { provider: &'static str },
}

impl BackendError {
    /// Whether the gateway should try the fallback provider.
    ///
    /// Deliberately narrow: only quota exhaustion qualifies. Timeouts and
    /// 5xx are *not* retried, matching the single-fallback design.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BackendError::RateLimited { .. })
    }
}

/// Primary-plus-fallback provider pair.
#[derive(Clone)]
pub struct Gateway {
    primary: Arc<dyn ChatBackend>,
    fallback: Option<Arc<dyn ChatBackend>>,
    temperature: f32,
}

impl Gateway {
    pub fn new(
        primary: Arc<dyn ChatBackend>,
        fallback: Option<Arc<dyn ChatBackend>>,
        temperature: f32,
    ) -> Self {
        Self {
            primary,
            fallback,
            temperature,
        }
    }

    /// Run `prompt` expecting a JSON object back.
    ///
    /// Primary first; on a retryable failure, one fallback attempt. The
    /// returned value is exactly the parsed payload of whichever provider
    /// answered.
    pub async fn generate_json(&self, prompt: &str) -> Result<serde_json::Value, AnalyzerError> {
        let request = ChatRequest {
            prompt: prompt.to_string(),
            temperature: self.temperature,
            json_output: true,
        };

        debug!(provider = self.primary.name(), "sending prompt to primary");
        let primary_err = match self.primary.complete(&request).await {
            Ok(text) => return parse_json_response(&text),
            Err(e) if e.is_retryable() => e,
            Err(e) => {
                return Err(AnalyzerError::PrimaryProviderFailed {
                    provider: self.primary.name().to_string(),
                    detail: e.to_string(),
                })
            }
        };

        let Some(fallback) = &self.fallback else {
            return Err(AnalyzerError::AllProvidersFailed {
                primary: primary_err.to_string(),
                fallback: "no fallback provider configured".to_string(),
            });
        };

        warn!(
            primary = self.primary.name(),
            fallback = fallback.name(),
            "primary rate-limited, trying fallback: {primary_err}"
        );

        match fallback.complete(&request).await {
            Ok(text) => parse_json_response(&text),
            Err(fallback_err) => Err(AnalyzerError::AllProvidersFailed {
                primary: primary_err.to_string(),
                fallback: fallback_err.to_string(),
            }),
        }
    }

    /// Run `prompt` expecting plain text back. Primary only, no fallback —
    /// the translation path, where a different backing model would change
    /// the voice mid-conversation.
    pub async fn generate_text(
        &self,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, AnalyzerError> {
        let request = ChatRequest {
            prompt: prompt.to_string(),
            temperature,
            json_output: false,
        };

        self.primary
            .complete(&request)
            .await
            .map_err(|e| AnalyzerError::PrimaryProviderFailed {
                provider: self.primary.name().to_string(),
                detail: e.to_string(),
            })
    }
}

// ── Response parsing ─────────────────────────────────────────────────────

static RE_JSON_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:json)?\s*(.*?)\s*```$").expect("static regex"));

/// Strip an optional outer markdown fence.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    match RE_JSON_FENCES.captures(trimmed) {
        Some(caps) => caps.get(1).map(|m| m.as_str()).unwrap_or(trimmed),
        None => trimmed,
    }
}

/// Parse provider output as a JSON value.
fn parse_json_response(text: &str) -> Result<serde_json::Value, AnalyzerError> {
    serde_json::from_str(strip_code_fences(text)).map_err(|e| AnalyzerError::MalformedResponse {
        detail: e.to_string(),
    })
}
