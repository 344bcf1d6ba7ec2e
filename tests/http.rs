//! Router-level tests: requests go through the real axum router with
//! scripted providers behind the analyzer.

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use common::ScriptedBackend;
use manifesto_lens::{server, Analyzer, AnalyzerConfig, Gateway};
use std::sync::Arc;
use tower::util::ServiceExt;

const BOUNDARY: &str = "X-TEST-BOUNDARY";

fn app_with(primary: Arc<ScriptedBackend>) -> Router {
    let config = AnalyzerConfig::default();
    let gateway = Gateway::new(primary, None, config.temperature);
    let analyzer = Arc::new(Analyzer::with_gateway(config.clone(), gateway));
    server::router(analyzer, &config.allowed_origins)
}

/// Build a single-field multipart body for `POST /analyze/`.
fn multipart_upload(field_name: &str, filename: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field_name}\"; filename=\"{filename}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn analyze_request(filename: &str, content_type: &str, bytes: &[u8]) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/analyze/")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_upload("file", filename, content_type, bytes)))
        .unwrap()
}

fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let app = app_with(ScriptedBackend::replying("gemini-mock", "{}"));

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn analyze_returns_structured_json() {
    let primary = ScriptedBackend::replying("gemini-mock", &common::analysis_payload());
    let app = app_with(primary.clone());

    let response = app
        .oneshot(analyze_request(
            "bjp_manifesto_2024.pdf",
            "application/pdf",
            &common::manifesto_pdf(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["party_name"], "BJP");
    assert_eq!(json["filename"], "bjp_manifesto_2024.pdf");
    assert_eq!(primary.call_count(), 1);
}

#[tokio::test]
async fn analyze_rejects_non_pdf_uploads() {
    let primary = ScriptedBackend::replying("gemini-mock", &common::analysis_payload());
    let app = app_with(primary.clone());

    let response = app
        .oneshot(analyze_request(
            "notes.txt",
            "text/plain",
            b"just some plain text",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("upload a PDF"));
    assert_eq!(json["status"], 400);
    assert_eq!(primary.call_count(), 0);
}

#[tokio::test]
async fn analyze_requires_the_file_field() {
    let app = app_with(ScriptedBackend::replying("gemini-mock", "{}"));

    let body = multipart_upload("document", "m.pdf", "application/pdf", b"%PDF-");
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/analyze/")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("'file'"));
}

#[tokio::test]
async fn keyword_free_upload_is_a_400_not_a_500() {
    let primary = ScriptedBackend::replying("gemini-mock", &common::analysis_payload());
    let app = app_with(primary.clone());

    let response = app
        .oneshot(analyze_request(
            "thanks.pdf",
            "application/pdf",
            &common::irrelevant_pdf(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("Not enough relevant text"));
    assert_eq!(primary.call_count(), 0);
}

#[tokio::test]
async fn provider_failure_is_a_500() {
    let primary = ScriptedBackend::failing("gemini-mock", "invalid API key");
    let app = app_with(primary);

    let response = app
        .oneshot(analyze_request(
            "manifesto.pdf",
            "application/pdf",
            &common::manifesto_pdf(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("primary AI model"));
    assert_eq!(json["status"], 500);
}

#[tokio::test]
async fn compare_returns_the_comparison() {
    let primary = ScriptedBackend::replying("gemini-mock", &common::comparison_payload());
    let app = app_with(primary);

    let response = app
        .oneshot(json_request(
            "/compare/",
            serde_json::json!({
                "analysisA": { "party_name": "Congress" },
                "analysisB": { "party_name": "BJP" },
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["party_names"]["party_a"], "Congress");
    assert!(json["head_to_head"]["economy"].is_string());
}

#[tokio::test]
async fn compare_requires_both_analyses() {
    let primary = ScriptedBackend::replying("gemini-mock", &common::comparison_payload());
    let app = app_with(primary.clone());

    let response = app
        .oneshot(json_request(
            "/compare/",
            serde_json::json!({ "analysisA": { "party_name": "Congress" } }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        "Both Manifesto A and Manifesto B analyses are required."
    );
    assert_eq!(primary.call_count(), 0);
}

#[tokio::test]
async fn translate_round_trips_text() {
    let primary = ScriptedBackend::replying("gemini-mock", "নমস্কার");
    let app = app_with(primary.clone());

    let response = app
        .oneshot(json_request(
            "/translate/",
            serde_json::json!({ "text": "Hello", "language": "Bengali" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["translated_text"], "নমস্কার");

    let request = primary.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(request.temperature, 0.0);
}

#[tokio::test]
async fn translate_requires_text_and_language() {
    let primary = ScriptedBackend::replying("gemini-mock", "ignored");
    let app = app_with(primary.clone());

    let response = app
        .oneshot(json_request(
            "/translate/",
            serde_json::json!({ "text": "  ", "language": "Bengali" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Text and target language are required.");
    assert_eq!(primary.call_count(), 0);
}
