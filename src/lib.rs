//! # manifesto-lens
//!
//! Analyze, compare, and translate political manifestos uploaded as PDFs.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF bytes
//!  │
//!  ├─ 1. Hash     SHA-256 content hash; identical uploads hit the cache
//!  ├─ 2. Extract  per-page text via lopdf; OCR fallback for scanned PDFs
//!  ├─ 3. Filter   drop the cover page, keep policy-keyword pages, truncate
//!  ├─ 4. Prompt   fixed analysis template with a pinned JSON schema
//!  ├─ 5. Gateway  Gemini primary; DeepSeek fallback on quota exhaustion
//!  └─ 6. Cache    structured result stored for the process lifetime
//! ```
//!
//! The comparison endpoint feeds two cached analyses back through a second
//! template; translation is a single plain-text call at temperature 0.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use manifesto_lens::{Analyzer, AnalyzerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AnalyzerConfig::from_env();
//!     let analyzer = Analyzer::new(config)?;
//!
//!     let bytes = std::fs::read("manifesto.pdf")?;
//!     let analysis = analyzer.analyze(bytes, "manifesto.pdf").await?;
//!     println!("{}", serde_json::to_string_pretty(&analysis)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `server` | on      | Enables the axum HTTP server and the `manifesto-lens` binary |
//!
//! Disable `server` when embedding only the analysis library:
//! ```toml
//! manifesto-lens = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analysis;
pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod pipeline;
pub mod prompts;
pub mod service;

#[cfg(feature = "server")]
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analysis::{
    AnalysisResult, AudienceBreakdown, AudienceInsight, ComparisonResult, HeadToHead, PartyNames,
};
pub use cache::{content_hash, AnalysisCache};
pub use config::{AnalyzerConfig, AnalyzerConfigBuilder};
pub use error::AnalyzerError;
pub use gateway::{BackendError, ChatBackend, ChatRequest, DeepSeekBackend, Gateway, GeminiBackend};
pub use service::Analyzer;
