//! Router-level integration tests with mock port implementations.
//!
//! Every external collaborator (extraction tooling, the generation LLM) is
//! replaced by an in-process mock so the full request path can be exercised
//! without network access.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use api_lib::config::Config;
use api_lib::web::rest::MAX_FILE_BYTES;
use api_lib::web::{create_router, state::AppState};
use async_trait::async_trait;
use studygen_core::domain::OutputKind;
use studygen_core::ports::{
    ContentGenerationService, PortError, PortResult, TextExtractionService,
};
use studygen_core::structure::extract_flashcards;
use tracing::Level;

const BOUNDARY: &str = "studygen-test-boundary";

const FLASHCARD_REPLY: &str = "Here are your flashcards:\n\nQuestion: What is X?\nAnswer: X is Y.\n\nQuestion: What is Z?\nAnswer: Z is W.\n\nI hope this helps!";

//=========================================================================================
// Mock Port Implementations
//=========================================================================================

struct MockExtractor;

#[async_trait]
impl TextExtractionService for MockExtractor {
    async fn extract_text(
        &self,
        _file_name: &str,
        _content_type: &str,
        data: &[u8],
    ) -> PortResult<String> {
        String::from_utf8(data.to_vec()).map_err(|e| PortError::InvalidInput(e.to_string()))
    }
}

struct MockGenerator {
    reply: String,
}

#[async_trait]
impl ContentGenerationService for MockGenerator {
    async fn generate(
        &self,
        _kind: OutputKind,
        _document_text: &str,
        _api_key: Option<&str>,
    ) -> PortResult<String> {
        Ok(self.reply.clone())
    }
}

struct RateLimitedGenerator;

#[async_trait]
impl ContentGenerationService for RateLimitedGenerator {
    async fn generate(
        &self,
        _kind: OutputKind,
        _document_text: &str,
        _api_key: Option<&str>,
    ) -> PortResult<String> {
        Err(PortError::RateLimited("Rate limit reached".to_string()))
    }
}

struct NoModelAccessGenerator;

#[async_trait]
impl ContentGenerationService for NoModelAccessGenerator {
    async fn generate(
        &self,
        _kind: OutputKind,
        _document_text: &str,
        _api_key: Option<&str>,
    ) -> PortResult<String> {
        Err(PortError::ModelAccess("no model available".to_string()))
    }
}

//=========================================================================================
// Test Helpers
//=========================================================================================

fn test_config(default_key: Option<&str>) -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        log_level: Level::INFO,
        openai_api_key: default_key.map(str::to_string),
        generation_models: vec!["mock-model".to_string()],
        tesseract_command: "tesseract".to_string(),
    }
}

fn test_router(generator: Arc<dyn ContentGenerationService>, default_key: Option<&str>) -> axum::Router {
    let state = Arc::new(AppState {
        config: Arc::new(test_config(default_key)),
        extractor: Arc::new(MockExtractor),
        generator,
    });
    create_router(state)
}

struct FilePart<'a> {
    filename: &'a str,
    content_type: &'a str,
    data: &'a [u8],
}

fn multipart_body(file: Option<FilePart<'_>>, kind: Option<&str>, api_key: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(kind) = kind {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"type\"\r\n\r\n{kind}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(key) = api_key {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"apiKey\"\r\n\r\n{key}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(file) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.filename, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn generate_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/generate")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn json_request(uri: &str, payload: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn markdown_file(data: &[u8]) -> FilePart<'_> {
    FilePart {
        filename: "notes.md",
        content_type: "text/markdown",
        data,
    }
}

//=========================================================================================
// Tests
//=========================================================================================

#[tokio::test]
async fn health_endpoint_is_up() {
    let app = test_router(Arc::new(MockGenerator { reply: String::new() }), Some("sk-test"));
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn generates_flashcards_end_to_end() {
    let app = test_router(
        Arc::new(MockGenerator {
            reply: FLASHCARD_REPLY.to_string(),
        }),
        None,
    );
    let body = multipart_body(
        Some(markdown_file(b"# Biology\nCells are the unit of life.")),
        Some("flashcards"),
        Some("sk-user-key"),
    );
    let response = app.oneshot(generate_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let content = json["content"].as_str().unwrap();
    // Preamble and closing remark are stripped before the response is sent.
    assert!(content.starts_with("Question:"), "got: {content}");
    assert!(!content.contains("I hope this helps"));

    let cards = extract_flashcards(content);
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].question, "What is X?");
    assert_eq!(cards[1].answer, "Z is W.");
}

#[tokio::test]
async fn rejects_executable_upload() {
    let app = test_router(Arc::new(MockGenerator { reply: String::new() }), Some("sk-test"));
    let body = multipart_body(
        Some(FilePart {
            filename: "evil.exe",
            content_type: "application/octet-stream",
            data: b"MZ binary",
        }),
        Some("summary"),
        Some("sk-user-key"),
    );
    let response = app.oneshot(generate_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Unsupported file type"));
}

#[tokio::test]
async fn rejects_oversize_upload() {
    let app = test_router(Arc::new(MockGenerator { reply: String::new() }), Some("sk-test"));
    let oversize = vec![b'a'; MAX_FILE_BYTES + 1];
    let body = multipart_body(Some(markdown_file(&oversize)), Some("summary"), Some("sk-user-key"));
    let response = app.oneshot(generate_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

// A body big enough to trip the router's overall limit, not just the
// per-file ceiling, must still come back as 413 rather than a generic 400.
#[tokio::test]
async fn rejects_upload_exceeding_body_limit() {
    let app = test_router(Arc::new(MockGenerator { reply: String::new() }), Some("sk-test"));
    let oversize = vec![b'a'; MAX_FILE_BYTES + 3 * 1024 * 1024];
    let body = multipart_body(Some(markdown_file(&oversize)), Some("summary"), Some("sk-user-key"));
    let response = app.oneshot(generate_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn rejects_missing_type_field() {
    let app = test_router(Arc::new(MockGenerator { reply: String::new() }), Some("sk-test"));
    let body = multipart_body(Some(markdown_file(b"text")), None, Some("sk-user-key"));
    let response = app.oneshot(generate_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rejects_unknown_output_type() {
    let app = test_router(Arc::new(MockGenerator { reply: String::new() }), Some("sk-test"));
    let body = multipart_body(Some(markdown_file(b"text")), Some("essay"), Some("sk-user-key"));
    let response = app.oneshot(generate_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rejects_missing_file_field() {
    let app = test_router(Arc::new(MockGenerator { reply: String::new() }), Some("sk-test"));
    let body = multipart_body(None, Some("summary"), Some("sk-user-key"));
    let response = app.oneshot(generate_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn requires_api_key_when_no_default_is_configured() {
    let app = test_router(Arc::new(MockGenerator { reply: String::new() }), None);
    let body = multipart_body(Some(markdown_file(b"text")), Some("summary"), None);
    let response = app.oneshot(generate_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("API key"));
}

#[tokio::test]
async fn rate_limit_maps_to_429() {
    let app = test_router(Arc::new(RateLimitedGenerator), Some("sk-test"));
    let body = multipart_body(Some(markdown_file(b"text")), Some("summary"), None);
    let response = app.oneshot(generate_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn model_access_failure_maps_to_403() {
    let app = test_router(Arc::new(NoModelAccessGenerator), Some("sk-test"));
    let body = multipart_body(Some(markdown_file(b"text")), Some("summary"), None);
    let response = app.oneshot(generate_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn structure_endpoint_builds_flashcards() {
    let app = test_router(Arc::new(MockGenerator { reply: String::new() }), Some("sk-test"));
    let payload = serde_json::json!({
        "type": "flashcards",
        "content": FLASHCARD_REPLY,
    });
    let response = app.oneshot(json_request("/structure", payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["type"], "flashcards");
    let cards = json["cards"].as_array().unwrap();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0]["question"], "What is X?");
}

#[tokio::test]
async fn structure_endpoint_builds_outline() {
    let app = test_router(Arc::new(MockGenerator { reply: String::new() }), Some("sk-test"));
    let payload = serde_json::json!({
        "type": "outline",
        "content": "I. Intro\nA. Background\n1. Point one\n2. Point two\nII. Body",
    });
    let response = app.oneshot(json_request("/structure", payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let sections = json["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0]["subtopics"][0]["points"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn structure_endpoint_rejects_unknown_type() {
    let app = test_router(Arc::new(MockGenerator { reply: String::new() }), Some("sk-test"));
    let payload = serde_json::json!({ "type": "essay", "content": "text" });
    let response = app.oneshot(json_request("/structure", payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn export_markdown_is_a_passthrough() {
    let app = test_router(Arc::new(MockGenerator { reply: String::new() }), Some("sk-test"));
    let payload = serde_json::json!({
        "type": "summary",
        "content": "# Notes\nBody",
        "filename": "notes.md",
        "format": "markdown",
    });
    let response = app.oneshot(json_request("/export", payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/markdown"));
    assert_eq!(body_bytes(response).await, b"# Notes\nBody");
}

#[tokio::test]
async fn export_docx_returns_a_zip_container() {
    let app = test_router(Arc::new(MockGenerator { reply: String::new() }), Some("sk-test"));
    let payload = serde_json::json!({
        "type": "summary",
        "content": "# Notes\n- a point\nplain line",
        "filename": "notes",
        "format": "docx",
    });
    let response = app.oneshot(json_request("/export", payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = body_bytes(response).await;
    assert!(bytes.starts_with(b"PK"));
}

#[tokio::test]
async fn export_rejects_unknown_format() {
    let app = test_router(Arc::new(MockGenerator { reply: String::new() }), Some("sk-test"));
    let payload = serde_json::json!({
        "type": "summary",
        "content": "text",
        "filename": "notes",
        "format": "rtf",
    });
    let response = app.oneshot(json_request("/export", payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
