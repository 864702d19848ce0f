//! crates/studygen_core/src/structure/mod.rs
//!
//! Kind-specific structurers: pure functions that segment cleaned model
//! output into display records. All of them are best-effort heuristics over
//! whatever shape the model produced; none of them can fail.

pub mod flashcards;
pub mod keypoints;
pub mod outline;

pub use flashcards::extract_flashcards;
pub use keypoints::extract_key_points;
pub use outline::parse_outline;
