pub mod domain;
pub mod export;
pub mod normalize;
pub mod ports;
pub mod prompt;
pub mod structure;

pub use domain::{
    Flashcard, GeneratedContent, KeyPoints, OutlinePoint, OutlineSection, OutputKind,
    ParseOutputKindError,
};
pub use normalize::normalize;
pub use ports::{ContentGenerationService, PortError, PortResult, TextExtractionService};
pub use structure::{extract_flashcards, extract_key_points, parse_outline};
