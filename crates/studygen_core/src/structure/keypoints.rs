//! crates/studygen_core/src/structure/keypoints.rs
//!
//! Splits cleaned model output into an optional introduction and a list of
//! bullet points, folding continuation lines into the bullet they follow.

use crate::domain::KeyPoints;
use regex::Regex;
use std::sync::LazyLock;

static POINT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*(?:[-*]|\d+[.)])\s+").unwrap());

fn strip_marker(line: &str) -> String {
    POINT_MARKER.replace(line, "").trim().to_string()
}

/// Extracts key points from cleaned text.
///
/// Lines before the first marker line form the intro. A marker line starts a
/// bullet; following non-empty, non-marker lines are appended to it with a
/// single space. With no marker line anywhere, the intro stays empty and all
/// lines are treated as candidate bullet lines instead.
pub fn extract_key_points(text: &str) -> KeyPoints {
    let lines: Vec<&str> = text.lines().collect();
    let first_marker = lines.iter().position(|l| POINT_MARKER.is_match(l));

    let intro = match first_marker {
        Some(idx) => {
            let joined = lines[..idx]
                .iter()
                .map(|l| l.trim())
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            if joined.is_empty() {
                None
            } else {
                Some(joined)
            }
        }
        None => None,
    };

    let body_start = first_marker.unwrap_or(0);
    let mut bullets: Vec<String> = Vec::new();
    let mut open: Option<String> = None;

    for line in &lines[body_start..] {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if POINT_MARKER.is_match(line) {
            if let Some(done) = open.take() {
                bullets.push(done);
            }
            open = Some(strip_marker(line));
        } else {
            match open.as_mut() {
                Some(current) => {
                    current.push(' ');
                    current.push_str(trimmed);
                }
                // Only reachable when the text has no marker lines at all.
                None => open = Some(trimmed.to_string()),
            }
        }
    }
    if let Some(done) = open.take() {
        bullets.push(done);
    }

    KeyPoints { intro, bullets }
}
