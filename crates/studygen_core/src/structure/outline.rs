//! crates/studygen_core/src/structure/outline.rs
//!
//! Parses cleaned model output into outline sections.
//!
//! A small state machine walks the non-empty trimmed lines left to right:
//! roman-numeral items and markdown headings open sections, single capital
//! letters open subtopics, numbered/bulleted items become detail points, and
//! anything else is silently ignored. Missing parents are created with
//! default titles so detail lines are never dropped.

use crate::domain::{OutlinePoint, OutlineSection};
use regex::Regex;
use std::sync::LazyLock;

const DEFAULT_SECTION_TITLE: &str = "Outline";
const DEFAULT_SUBTOPIC_TITLE: &str = "Details";

// Roman numerals are checked before the single-capital-letter rule, so
// "I. Intro" opens a section while "A. Background" opens a subtopic.
static ROMAN_SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[IVXLCDM]+\.\s+(.+)$").unwrap());
static MARKDOWN_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,6}\s+(.+)$").unwrap());
static LETTER_SUBTOPIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]\.\s+(.+)$").unwrap());
static NUMBERED_POINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.)]\s+(.+)$").unwrap());
static BULLET_POINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*]\s+(.+)$").unwrap());

fn section_title(line: &str) -> Option<String> {
    ROMAN_SECTION
        .captures(line)
        .or_else(|| MARKDOWN_HEADING.captures(line))
        .map(|caps| caps[1].trim().to_string())
}

fn subtopic_title(line: &str) -> Option<String> {
    LETTER_SUBTOPIC.captures(line).map(|caps| caps[1].trim().to_string())
}

fn point_text(line: &str) -> Option<String> {
    NUMBERED_POINT
        .captures(line)
        .or_else(|| BULLET_POINT.captures(line))
        .map(|caps| caps[1].trim().to_string())
}

/// Parses cleaned text into ordered outline sections. Lines matching no
/// marker class produce nothing.
pub fn parse_outline(text: &str) -> Vec<OutlineSection> {
    let mut sections: Vec<OutlineSection> = Vec::new();
    let mut current: Option<OutlineSection> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(title) = section_title(line) {
            if let Some(done) = current.take() {
                sections.push(done);
            }
            current = Some(OutlineSection {
                title,
                subtopics: Vec::new(),
            });
        } else if let Some(title) = subtopic_title(line) {
            let section = current.get_or_insert_with(|| OutlineSection {
                title: DEFAULT_SECTION_TITLE.to_string(),
                subtopics: Vec::new(),
            });
            section.subtopics.push(OutlinePoint {
                title,
                points: Vec::new(),
            });
        } else if let Some(point) = point_text(line) {
            let section = current.get_or_insert_with(|| OutlineSection {
                title: DEFAULT_SECTION_TITLE.to_string(),
                subtopics: Vec::new(),
            });
            if section.subtopics.is_empty() {
                section.subtopics.push(OutlinePoint {
                    title: DEFAULT_SUBTOPIC_TITLE.to_string(),
                    points: Vec::new(),
                });
            }
            // A subtopic always exists here.
            section.subtopics.last_mut().unwrap().points.push(point);
        }
    }

    if let Some(done) = current.take() {
        sections.push(done);
    }
    sections
}
