//! crates/studygen_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like OCR tools or LLM APIs.

use crate::domain::OutputKind;
use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
///
/// The variants mirror the HTTP taxonomy the service exposes: invalid input,
/// bad credential, no model access, rate limited, and everything else.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),
    #[error("No access to any configured model: {0}")]
    ModelAccess(String),
    #[error("Rate limited by the upstream API: {0}")]
    RateLimited(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait TextExtractionService: Send + Sync {
    /// Extracts plain text from an uploaded file.
    ///
    /// `content_type` is the MIME type supplied with the upload (possibly
    /// empty); the implementation may also sniff the file extension.
    async fn extract_text(
        &self,
        file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> PortResult<String>;
}

#[async_trait]
pub trait ContentGenerationService: Send + Sync {
    /// Generates raw study-material text of the requested kind from the
    /// extracted document text.
    ///
    /// `api_key` overrides any server-side default credential when present.
    async fn generate(
        &self,
        kind: OutputKind,
        document_text: &str,
        api_key: Option<&str>,
    ) -> PortResult<String>;
}
