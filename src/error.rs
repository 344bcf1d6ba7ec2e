//! Error types for the manifesto-lens library.
//!
//! One enum covers the whole pipeline, but every variant falls into one of
//! two classes that the HTTP layer cares about:
//!
//! * **Client input errors** — the upload itself is unusable (wrong content
//!   type, image-only PDF, not enough relevant text). These map to 400 and
//!   retrying the same upload will never help.
//!
//! * **Server-side failures** — misconfiguration (OCR binaries missing, no
//!   API key) or provider failures. These map to 500.
//!
//! [`AnalyzerError::is_client_error`] encodes the split so the server module
//! never has to enumerate variants itself.

use thiserror::Error;

/// All errors returned by the manifesto-lens library.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    // ── Client input errors ───────────────────────────────────────────────
    /// The upload is not a PDF.
    #[error("Please upload a PDF (got content type '{content_type}').")]
    NotAPdf { content_type: String },

    /// The PDF header/xref could not be parsed at all.
    #[error("This PDF could not be parsed: {detail}")]
    CorruptPdf { detail: String },

    /// Extraction (including the OCR fallback) produced too little text to
    /// analyze.
    #[error(
        "This PDF could not be processed. It may be an image-based file or have \
         an unsupported format. Please try a different, text-based PDF."
    )]
    ImageOnlyPdf { extracted_chars: usize },

    /// The relevance filter kept too little text to build a useful prompt.
    #[error(
        "Not enough relevant text was found in this manifesto \
         ({found} chars after filtering, need at least {needed})."
    )]
    NotEnoughRelevantText { found: usize, needed: usize },

    // ── OCR errors ────────────────────────────────────────────────────────
    /// The OCR binaries are not installed. A deployment problem, not a
    /// property of the upload.
    #[error(
        "OCR tools are not available: {detail}\n\
         Install poppler-utils (pdftoppm) and tesseract-ocr to process scanned PDFs."
    )]
    OcrUnavailable { detail: String },

    /// OCR ran but failed partway through.
    #[error("OCR extraction failed: {detail}")]
    OcrFailed { detail: String },

    // ── Provider errors ───────────────────────────────────────────────────
    /// The primary provider failed with a non-retryable error.
    #[error("An error occurred with the primary AI model ({provider}): {detail}")]
    PrimaryProviderFailed { provider: String, detail: String },

    /// The primary provider was rate-limited and the fallback also failed.
    #[error(
        "Primary and fallback APIs failed. \
         Primary error: {primary}. Fallback error: {fallback}"
    )]
    AllProvidersFailed { primary: String, fallback: String },

    /// The provider answered, but the body was not the JSON we asked for.
    #[error("The AI model returned malformed JSON: {detail}")]
    MalformedResponse { detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AnalyzerError {
    /// True when the failure is a property of the upload rather than of the
    /// service, i.e. it should surface as HTTP 400 and not be retried.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AnalyzerError::NotAPdf { .. }
                | AnalyzerError::CorruptPdf { .. }
                | AnalyzerError::ImageOnlyPdf { .. }
                | AnalyzerError::NotEnoughRelevantText { .. }
        )
    }
}
