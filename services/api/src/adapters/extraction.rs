//! services/api/src/adapters/extraction.rs
//!
//! This module contains the adapter that turns uploaded files into plain text.
//! It implements the `TextExtractionService` port from the `core` crate.
//!
//! PDF text is read with `pdf-extract`; PNG uploads are handed to a tesseract
//! subprocess via a temp file; Markdown and plain text are decoded as UTF-8.

use async_trait::async_trait;
use std::path::PathBuf;
use studygen_core::ports::{PortError, PortResult, TextExtractionService};
use tracing::warn;
use uuid::Uuid;

/// The upload formats the service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Pdf,
    Png,
    Markdown,
    PlainText,
}

impl SourceFormat {
    /// Detects the format from the MIME type, falling back to the file
    /// extension when the MIME type is absent or unrecognized.
    pub fn detect(file_name: &str, content_type: &str) -> Option<Self> {
        match content_type {
            "application/pdf" => return Some(SourceFormat::Pdf),
            "image/png" => return Some(SourceFormat::Png),
            "text/markdown" => return Some(SourceFormat::Markdown),
            "text/plain" => return Some(SourceFormat::PlainText),
            _ => {}
        }
        let extension = file_name.rsplit('.').next().map(str::to_lowercase);
        match extension.as_deref() {
            Some("pdf") => Some(SourceFormat::Pdf),
            Some("png") => Some(SourceFormat::Png),
            Some("md") => Some(SourceFormat::Markdown),
            Some("txt") => Some(SourceFormat::PlainText),
            _ => None,
        }
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `TextExtractionService` port over local
/// extraction tools.
#[derive(Clone)]
pub struct DocumentTextExtractor {
    tesseract_command: String,
}

impl DocumentTextExtractor {
    /// Creates a new `DocumentTextExtractor`.
    pub fn new(tesseract_command: String) -> Self {
        Self { tesseract_command }
    }

    /// Extracts PDF text in a blocking task. Extraction failures and empty
    /// results degrade to a descriptive placeholder instead of failing the
    /// request; "no text found" is a valid success path.
    async fn extract_pdf(&self, file_name: &str, data: &[u8]) -> PortResult<String> {
        let bytes = data.to_vec();
        let extracted = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&bytes)
        })
        .await
        .map_err(|e| PortError::Unexpected(format!("PDF extraction task failed: {}", e)))?;

        match extracted {
            Ok(text) if !text.trim().is_empty() => Ok(text),
            Ok(_) => Ok(Self::pdf_placeholder(file_name)),
            Err(e) => {
                warn!("PDF extraction failed for '{}': {}", file_name, e);
                Ok(Self::pdf_placeholder(file_name))
            }
        }
    }

    fn pdf_placeholder(file_name: &str) -> String {
        format!(
            "[No readable text could be extracted from '{}'. The PDF may be scanned or image-based.]",
            file_name
        )
    }

    /// Runs tesseract over a temp file. The temp file is exclusively owned by
    /// this request and deleted unconditionally, whether or not OCR succeeds.
    async fn extract_png(&self, data: &[u8]) -> PortResult<String> {
        let temp_path: PathBuf =
            std::env::temp_dir().join(format!("studygen_ocr_{}.png", Uuid::new_v4()));
        tokio::fs::write(&temp_path, data).await.map_err(|e| {
            PortError::Unexpected(format!("Failed to write temp image file: {}", e))
        })?;

        let output = tokio::process::Command::new(&self.tesseract_command)
            .arg(&temp_path)
            .arg("stdout")
            .arg("-l")
            .arg("eng")
            .output()
            .await;

        let _ = tokio::fs::remove_file(&temp_path).await;

        let output = output.map_err(|e| {
            PortError::Unexpected(format!(
                "Failed to run OCR command '{}': {}",
                self.tesseract_command, e
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("OCR command failed: {}", stderr.trim());
            return Err(PortError::InvalidInput(
                "Could not read any text from the uploaded image".to_string(),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

//=========================================================================================
// `TextExtractionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TextExtractionService for DocumentTextExtractor {
    /// Extracts plain text from the uploaded file according to its format.
    async fn extract_text(
        &self,
        file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> PortResult<String> {
        let format = SourceFormat::detect(file_name, content_type).ok_or_else(|| {
            PortError::InvalidInput(format!(
                "Unsupported file type for '{}' (expected PDF, PNG, Markdown or plain text)",
                file_name
            ))
        })?;

        match format {
            SourceFormat::Pdf => self.extract_pdf(file_name, data).await,
            SourceFormat::Png => self.extract_png(data).await,
            SourceFormat::Markdown | SourceFormat::PlainText => String::from_utf8(data.to_vec())
                .map_err(|e| {
                    PortError::InvalidInput(format!("Uploaded file is not valid UTF-8 text: {}", e))
                }),
        }
    }
}
