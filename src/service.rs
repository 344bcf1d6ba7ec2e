//! The analysis service: orchestrates cache, pipeline, prompts, and gateway.
//!
//! [`Analyzer`] is the crate's main entry point. One instance lives for the
//! life of the process (the server wraps it in an `Arc`); everything inside
//! is either immutable or internally synchronized, so handlers share it
//! freely.
//!
//! Each request is handled independently. Extraction is synchronous
//! (lopdf + OCR subprocesses) and runs under `spawn_blocking` so a scanned
//! 40-page upload does not stall the async executor.

use crate::analysis::{AnalysisResult, ComparisonResult};
use crate::cache::{content_hash, AnalysisCache};
use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::gateway::{DeepSeekBackend, Gateway, GeminiBackend};
use crate::pipeline::{extract, filter};
use crate::prompts;
use std::sync::Arc;
use tracing::info;

pub struct Analyzer {
    config: AnalyzerConfig,
    cache: AnalysisCache,
    gateway: Gateway,
}

impl Analyzer {
    /// Build an analyzer with the real provider pair: Gemini primary,
    /// DeepSeek fallback.
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalyzerError> {
        let primary = Arc::new(GeminiBackend::new(&config)?);
        let fallback = Arc::new(DeepSeekBackend::new(&config)?);
        let gateway = Gateway::new(primary, Some(fallback), config.temperature);
        Ok(Self::with_gateway(config, gateway))
    }

    /// Build an analyzer around an existing gateway. The seam tests use to
    /// substitute scripted backends.
    pub fn with_gateway(config: AnalyzerConfig, gateway: Gateway) -> Self {
        Self {
            config,
            cache: AnalysisCache::new(),
            gateway,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn cache(&self) -> &AnalysisCache {
        &self.cache
    }

    /// Analyze an uploaded manifesto.
    ///
    /// Identical bytes hit the cache and return a copy of the stored result
    /// without touching the pipeline or the gateway.
    pub async fn analyze(
        &self,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<AnalysisResult, AnalyzerError> {
        let hash = content_hash(&bytes);

        if let Some(cached) = self.cache.lookup(&hash) {
            info!(filename, "cache hit");
            return Ok(cached);
        }
        info!(filename, "cache miss, analyzing");

        let config = self.config.clone();
        let pages = tokio::task::spawn_blocking(move || extract::extract_pages(&bytes, &config))
            .await
            .map_err(|e| AnalyzerError::Internal(format!("extraction task failed: {e}")))??;

        let text = filter::filter_relevant(&pages, &self.config)?;
        let prompt = prompts::analysis_prompt(&text);

        let payload = self.gateway.generate_json(&prompt).await?;
        let mut result: AnalysisResult =
            serde_json::from_value(payload).map_err(|e| AnalyzerError::MalformedResponse {
                detail: e.to_string(),
            })?;
        result.filename = Some(filename.to_string());

        self.cache.insert(hash, result.clone());
        Ok(result)
    }

    /// Compare two prior analyses head-to-head. Never cached: the pairing,
    /// not the documents, defines the result.
    pub async fn compare(
        &self,
        analysis_a: AnalysisResult,
        analysis_b: AnalysisResult,
    ) -> Result<ComparisonResult, AnalyzerError> {
        let party_a = prompts::resolve_party_name(&analysis_a, "Party A");
        let party_b = prompts::resolve_party_name(&analysis_b, "Party B");
        info!(%party_a, %party_b, "comparing analyses");

        let analysis_a_json = serde_json::to_string_pretty(&analysis_a)
            .map_err(|e| AnalyzerError::Internal(format!("serializing analysis A: {e}")))?;
        let analysis_b_json = serde_json::to_string_pretty(&analysis_b)
            .map_err(|e| AnalyzerError::Internal(format!("serializing analysis B: {e}")))?;

        let prompt = prompts::comparison_prompt(&party_a, &party_b, &analysis_a_json, &analysis_b_json);
        let payload = self.gateway.generate_json(&prompt).await?;

        serde_json::from_value(payload).map_err(|e| AnalyzerError::MalformedResponse {
            detail: e.to_string(),
        })
    }

    /// Translate free text. Temperature 0 for determinism, no JSON
    /// constraint, primary provider only.
    pub async fn translate(&self, text: &str, language: &str) -> Result<String, AnalyzerError> {
        info!(language, chars = text.chars().count(), "translating");
        let prompt = prompts::translation_prompt(text, language);
        self.gateway.generate_text(&prompt, 0.0).await
    }
}
