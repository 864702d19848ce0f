//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{
        multipart::MultipartError,
        DefaultBodyLimit, Multipart, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use studygen_core::{
    domain::{Flashcard, GeneratedContent, KeyPoints, OutlinePoint, OutlineSection, OutputKind},
    normalize::normalize,
    ports::PortError,
    structure::{extract_flashcards, extract_key_points, parse_outline},
    export,
};
use tracing::{error, info};
use utoipa::{OpenApi, ToSchema};

/// The hard ceiling for uploaded file size, enforced per file part.
pub const MAX_FILE_BYTES: usize = 50 * 1024 * 1024;

// Slack on top of the file ceiling so multipart framing never trips the body
// limit before the per-file check runs.
const BODY_LIMIT_BYTES: usize = MAX_FILE_BYTES + 2 * 1024 * 1024;

const ALLOWED_MIME_TYPES: [&str; 4] = [
    "application/pdf",
    "image/png",
    "text/markdown",
    "text/plain",
];
const ALLOWED_EXTENSIONS: [&str; 4] = ["pdf", "png", "md", "txt"];

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        generate_handler,
        structure_handler,
        export_handler,
    ),
    components(
        schemas(
            GenerateResponse,
            ErrorBody,
            StructureRequest,
            StructuredContent,
            FlashcardView,
            OutlineSectionView,
            OutlinePointView,
            KeyPointsView,
            ExportRequest,
        )
    ),
    tags(
        (name = "studygen API", description = "API endpoints for generating study material from uploaded documents.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The response payload for a successful generation call.
#[derive(Serialize, ToSchema)]
pub struct GenerateResponse {
    pub content: String,
}

/// The error payload used by every failing endpoint.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// Request payload for structuring previously generated content.
#[derive(Deserialize, ToSchema)]
pub struct StructureRequest {
    /// One of: summary, points, flashcards, quiz, outline.
    pub r#type: String,
    pub content: String,
}

#[derive(Serialize, ToSchema)]
pub struct FlashcardView {
    pub question: String,
    pub answer: String,
}

impl From<Flashcard> for FlashcardView {
    fn from(card: Flashcard) -> Self {
        Self {
            question: card.question,
            answer: card.answer,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct OutlinePointView {
    pub title: String,
    pub points: Vec<String>,
}

impl From<OutlinePoint> for OutlinePointView {
    fn from(point: OutlinePoint) -> Self {
        Self {
            title: point.title,
            points: point.points,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct OutlineSectionView {
    pub title: String,
    pub subtopics: Vec<OutlinePointView>,
}

impl From<OutlineSection> for OutlineSectionView {
    fn from(section: OutlineSection) -> Self {
        Self {
            title: section.title,
            subtopics: section.subtopics.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct KeyPointsView {
    pub intro: Option<String>,
    pub bullets: Vec<String>,
}

impl From<KeyPoints> for KeyPointsView {
    fn from(kp: KeyPoints) -> Self {
        Self {
            intro: kp.intro,
            bullets: kp.bullets,
        }
    }
}

/// The kind-specific structured records derived from cleaned content.
#[derive(Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StructuredContent {
    Summary { text: String },
    Points { key_points: KeyPointsView },
    Flashcards { cards: Vec<FlashcardView> },
    Quiz { text: String },
    Outline { sections: Vec<OutlineSectionView> },
}

/// Request payload for exporting generated content as a document.
#[derive(Deserialize, ToSchema)]
pub struct ExportRequest {
    /// One of: summary, points, flashcards, quiz, outline.
    pub r#type: String,
    pub content: String,
    pub filename: String,
    /// One of: markdown, html, docx.
    pub format: String,
}

//=========================================================================================
// Error Mapping
//=========================================================================================

type ErrorResponse = (StatusCode, Json<ErrorBody>);

fn error_response(status: StatusCode, message: impl Into<String>) -> ErrorResponse {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

/// Maps a port error onto the HTTP error taxonomy: validation 400,
/// credential 401, model access 403, rate limit 429, everything else 500.
fn port_error_response(err: PortError) -> ErrorResponse {
    let status = match &err {
        PortError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        PortError::InvalidApiKey(_) => StatusCode::UNAUTHORIZED,
        PortError::ModelAccess(_) => StatusCode::FORBIDDEN,
        PortError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        PortError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("Generation request failed: {}", err);
    }
    error_response(status, err.to_string())
}

/// Maps a multipart read failure. A body-limit overrun surfaces here as a
/// stream read error carrying a 413 status; everything else is a malformed
/// request.
fn multipart_error_response(err: MultipartError) -> ErrorResponse {
    let status = err.status();
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        error_response(status, "File exceeds the 50 MiB size limit")
    } else {
        error_response(status, format!("Failed to read multipart data: {}", err))
    }
}

fn validate_upload(file_name: &str, content_type: &str) -> Result<(), ErrorResponse> {
    let extension = file_name.rsplit('.').next().map(str::to_lowercase);
    let extension_ok = extension
        .as_deref()
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext));
    if !extension_ok {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            format!(
                "Unsupported file type for '{}' (allowed: .pdf, .png, .md, .txt)",
                file_name
            ),
        ));
    }
    // Browsers sometimes tag known extensions as octet-stream; anything else
    // off the allow-list is rejected.
    if !content_type.is_empty()
        && content_type != "application/octet-stream"
        && !ALLOWED_MIME_TYPES.contains(&content_type)
    {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            format!("Unsupported content type '{}'", content_type),
        ));
    }
    Ok(())
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health_handler() -> StatusCode {
    StatusCode::OK
}

/// Generate study material from an uploaded document.
///
/// Accepts a multipart/form-data request with fields `file` (the document),
/// `type` (the output kind) and `apiKey` (optional when the server has a
/// default credential configured).
#[utoipa::path(
    post,
    path = "/generate",
    request_body(content_type = "multipart/form-data", description = "The document to process, the requested output type and an optional API key."),
    responses(
        (status = 200, description = "Generation succeeded", body = GenerateResponse),
        (status = 400, description = "Missing field, unsupported file type or unparseable content", body = ErrorBody),
        (status = 401, description = "Invalid API key", body = ErrorBody),
        (status = 403, description = "No access to any configured model", body = ErrorBody),
        (status = 413, description = "File exceeds the 50 MiB ceiling", body = ErrorBody),
        (status = 429, description = "Rate limited by the upstream API", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn generate_handler(
    State(app_state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<GenerateResponse>, ErrorResponse> {
    let mut file: Option<(String, String, Bytes)> = None;
    let mut kind: Option<OutputKind> = None;
    let mut api_key: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error_response)?
    {
        match field.name().unwrap_or("") {
            "file" => {
                let name = field.file_name().unwrap_or("untitled.txt").to_string();
                let content_type = field.content_type().unwrap_or("").to_string();
                let data = field.bytes().await.map_err(multipart_error_response)?;
                file = Some((name, content_type, data));
            }
            "type" => {
                let value = field.text().await.map_err(multipart_error_response)?;
                kind = Some(
                    value
                        .parse::<OutputKind>()
                        .map_err(|e| error_response(StatusCode::BAD_REQUEST, e.to_string()))?,
                );
            }
            "apiKey" => {
                let value = field.text().await.map_err(multipart_error_response)?;
                if !value.trim().is_empty() {
                    api_key = Some(value);
                }
            }
            _ => {}
        }
    }

    let (file_name, content_type, data) = file.ok_or_else(|| {
        error_response(
            StatusCode::BAD_REQUEST,
            "Multipart form must include a 'file' field",
        )
    })?;
    let kind = kind.ok_or_else(|| {
        error_response(
            StatusCode::BAD_REQUEST,
            "Multipart form must include a 'type' field",
        )
    })?;
    if api_key.is_none() && app_state.config.openai_api_key.is_none() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "An API key is required (no server-side default is configured)",
        ));
    }

    validate_upload(&file_name, &content_type)?;
    if data.len() > MAX_FILE_BYTES {
        return Err(error_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            "File exceeds the 50 MiB size limit",
        ));
    }

    let document_text = app_state
        .extractor
        .extract_text(&file_name, &content_type, &data)
        .await
        .map_err(port_error_response)?;
    if document_text.trim().is_empty() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "The uploaded file contains no extractable text",
        ));
    }

    let raw = app_state
        .generator
        .generate(kind, &document_text, api_key.as_deref())
        .await
        .map_err(port_error_response)?;

    let generated = GeneratedContent::new(kind, normalize(&raw, kind), file_name);
    info!(
        "Generated {} content {} from '{}'",
        generated.kind, generated.id, generated.filename
    );
    Ok(Json(GenerateResponse {
        content: generated.content,
    }))
}

/// Structure previously generated content into kind-specific records.
///
/// Runs the normalizer and the kind-specific structurer over the supplied
/// content. Structuring is a pure function: the same input always yields the
/// same records.
#[utoipa::path(
    post,
    path = "/structure",
    request_body = StructureRequest,
    responses(
        (status = 200, description = "Structured records", body = StructuredContent),
        (status = 400, description = "Unknown output type", body = ErrorBody)
    )
)]
pub async fn structure_handler(
    Json(request): Json<StructureRequest>,
) -> Result<Json<StructuredContent>, ErrorResponse> {
    let kind = request
        .r#type
        .parse::<OutputKind>()
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, e.to_string()))?;
    let cleaned = normalize(&request.content, kind);

    let structured = match kind {
        OutputKind::Summary => StructuredContent::Summary { text: cleaned },
        OutputKind::Quiz => StructuredContent::Quiz { text: cleaned },
        OutputKind::Points => StructuredContent::Points {
            key_points: extract_key_points(&cleaned).into(),
        },
        OutputKind::Flashcards => StructuredContent::Flashcards {
            cards: extract_flashcards(&cleaned).into_iter().map(Into::into).collect(),
        },
        OutputKind::Outline => StructuredContent::Outline {
            sections: parse_outline(&cleaned).into_iter().map(Into::into).collect(),
        },
    };
    Ok(Json(structured))
}

// Content-disposition filenames come from the client; keep them boring.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        "study-material".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Export generated content as a downloadable document.
#[utoipa::path(
    post,
    path = "/export",
    request_body = ExportRequest,
    responses(
        (status = 200, description = "Exported document bytes"),
        (status = 400, description = "Unknown output type or format", body = ErrorBody),
        (status = 500, description = "Document generation failed", body = ErrorBody)
    )
)]
pub async fn export_handler(
    Json(request): Json<ExportRequest>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let kind = request
        .r#type
        .parse::<OutputKind>()
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, e.to_string()))?;
    let generated = GeneratedContent::new(kind, request.content, request.filename);

    let (bytes, mime, extension) = match request.format.trim().to_lowercase().as_str() {
        "markdown" => (
            Bytes::from(export::to_markdown(&generated)),
            "text/markdown; charset=utf-8",
            "md",
        ),
        "html" => (
            Bytes::from(export::to_html(&generated)),
            "text/html; charset=utf-8",
            "html",
        ),
        "docx" => (
            Bytes::from(export::to_docx(&generated).map_err(port_error_response)?),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "docx",
        ),
        other => {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                format!("'{}' is not a valid export format (expected markdown, html or docx)", other),
            ))
        }
    };

    let disposition = format!(
        "attachment; filename=\"{}.{}\"",
        sanitize_filename(&generated.filename),
        extension
    );
    Ok((
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

//=========================================================================================
// Router Construction
//=========================================================================================

/// Builds the API router with all routes, the body limit and the shared state.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/generate", post(generate_handler))
        .route("/structure", post(structure_handler))
        .route("/export", post(export_handler))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(app_state)
}
