//! HTTP surface: axum router, handlers, CORS, and error mapping.
//!
//! Handlers are thin shims over [`Analyzer`]; all domain logic and error
//! classification live in the library. [`ApiError`] is the single
//! `IntoResponse` type — client input errors become 400, everything else
//! 500, with the explanatory message in a JSON body either way.
//!
//! CORS allows a fixed origin list (local dev plus the configured frontend)
//! with credentials; methods and headers are mirrored from the request,
//! which is what tower-http requires once credentials are on.

use crate::analysis::{AnalysisResult, ComparisonResult};
use crate::error::AnalyzerError;
use crate::service::Analyzer;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

/// Largest accepted upload. Party manifestos run to a few hundred pages of
/// mostly images; 25 MiB covers everything seen in practice.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Build the application router.
pub fn router(analyzer: Arc<Analyzer>, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        .route("/health", get(health))
        .route("/analyze/", post(analyze))
        .route("/compare/", post(compare))
        .route("/translate/", post(translate))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(analyzer)
}

// ── Error mapping ────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),

    #[error("{0}")]
    InvalidRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Analyzer(e) if e.is_client_error() => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ApiError::Analyzer(e) => {
                error!("request failed: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────

async fn health() -> &'static str {
    "OK"
}

/// `POST /analyze/` — multipart upload of one `application/pdf` file.
async fn analyze(
    State(analyzer): State<Arc<Analyzer>>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if content_type != "application/pdf" {
            return Err(AnalyzerError::NotAPdf { content_type }.into());
        }

        let filename = field.file_name().unwrap_or("upload.pdf").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to read upload: {e}")))?;

        let result = analyzer.analyze(bytes.to_vec(), &filename).await?;
        return Ok(Json(result));
    }

    Err(ApiError::InvalidRequest(
        "Missing 'file' field in multipart upload.".to_string(),
    ))
}

#[derive(Debug, Deserialize)]
struct CompareRequest {
    #[serde(rename = "analysisA")]
    analysis_a: Option<AnalysisResult>,
    #[serde(rename = "analysisB")]
    analysis_b: Option<AnalysisResult>,
}

/// `POST /compare/` — JSON body with two prior analyses.
async fn compare(
    State(analyzer): State<Arc<Analyzer>>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<ComparisonResult>, ApiError> {
    let (Some(analysis_a), Some(analysis_b)) = (request.analysis_a, request.analysis_b) else {
        return Err(ApiError::InvalidRequest(
            "Both Manifesto A and Manifesto B analyses are required.".to_string(),
        ));
    };

    let result = analyzer.compare(analysis_a, analysis_b).await?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
struct TranslateRequest {
    text: Option<String>,
    language: Option<String>,
}

#[derive(Debug, Serialize)]
struct TranslateResponse {
    translated_text: String,
}

/// `POST /translate/` — JSON body `{text, language}`.
async fn translate(
    State(analyzer): State<Arc<Analyzer>>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let (Some(text), Some(language)) = (
        request.text.filter(|t| !t.trim().is_empty()),
        request.language.filter(|l| !l.trim().is_empty()),
    ) else {
        return Err(ApiError::InvalidRequest(
            "Text and target language are required.".to_string(),
        ));
    };

    let translated_text = analyzer.translate(&text, &language).await?;
    Ok(Json(TranslateResponse { translated_text }))
}
