//! crates/studygen_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The study-material format a user can request from an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Summary,
    Points,
    Flashcards,
    Quiz,
    Outline,
}

impl OutputKind {
    /// The wire name used in form fields and JSON payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputKind::Summary => "summary",
            OutputKind::Points => "points",
            OutputKind::Flashcards => "flashcards",
            OutputKind::Quiz => "quiz",
            OutputKind::Outline => "outline",
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a wire string names no known output kind.
#[derive(Debug, thiserror::Error)]
#[error("'{0}' is not a valid output type (expected summary, points, flashcards, quiz or outline)")]
pub struct ParseOutputKindError(pub String);

impl FromStr for OutputKind {
    type Err = ParseOutputKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "summary" => Ok(OutputKind::Summary),
            "points" => Ok(OutputKind::Points),
            "flashcards" => Ok(OutputKind::Flashcards),
            "quiz" => Ok(OutputKind::Quiz),
            "outline" => Ok(OutputKind::Outline),
            other => Err(ParseOutputKindError(other.to_string())),
        }
    }
}

/// Represents one successful generation run for an uploaded document.
///
/// Created once per generation call, immutable, and replaced wholesale by the
/// next run. Nothing is persisted; every derived structure below is recomputed
/// from `content` and `kind` on demand.
#[derive(Debug, Clone)]
pub struct GeneratedContent {
    pub id: Uuid,
    pub kind: OutputKind,
    pub content: String,
    pub filename: String,
    pub generated_at: DateTime<Utc>,
}

impl GeneratedContent {
    /// Creates a new `GeneratedContent` with a fresh id and timestamp.
    pub fn new(kind: OutputKind, content: String, filename: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            content,
            filename,
            generated_at: Utc::now(),
        }
    }
}

/// A single question-and-answer study card, derived from generated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}

/// A subtopic within an outline section, holding its detail points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlinePoint {
    pub title: String,
    pub points: Vec<String>,
}

/// A top-level outline section with its ordered subtopics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineSection {
    pub title: String,
    pub subtopics: Vec<OutlinePoint>,
}

/// The key-point view of generated text: an optional introduction followed
/// by ordered bullets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPoints {
    pub intro: Option<String>,
    pub bullets: Vec<String>,
}
