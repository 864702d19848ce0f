//! crates/studygen_core/src/normalize.rs
//!
//! Cleans raw model output before it is returned to the client or structured.
//! The model tends to wrap the requested material in conversational filler
//! ("Here is your summary: ...", "... I hope this helps!"); this module strips
//! that filler with an ordered list of regex rules and normalizes whitespace.
//!
//! `normalize` is total: it never fails, and with no matches it returns the
//! trimmed input unchanged.

use crate::domain::OutputKind;
use regex::Regex;
use std::sync::LazyLock;

// Leading conversational phrases. Openers stack ("Sure! Here is ..."), so
// the stripping pass re-runs the whole list until no pattern matches.
const LEADING_PHRASE_PATTERNS: [&str; 8] = [
    r"(?i)^(?:sure|certainly|of course|absolutely|great)[!,.:]\s*",
    r"(?i)^here (?:is|are)\b[^\n]*?[:.]\s*",
    r"(?i)^here's\b[^\n]*?[:.]\s*",
    r"(?i)^i'?ll\b[^\n]*?[:.]\s*",
    r"(?i)^i(?: have|'ve) (?:created|prepared|generated|made|written)\b[^\n]*?[:.]\s*",
    r"(?i)^based on\b[^\n]*?[,:.]\s*",
    r"(?i)^below (?:is|are)\b[^\n]*?[:.]\s*",
    r"(?i)^the following\b[^\n]*?[:.]\s*",
];

static LEADING_PHRASES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    LEADING_PHRASE_PATTERNS
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
});

// The first recognizable flashcard marker: a Question/Q label, a numbered
// item, or a dash/asterisk bullet at the start of a line.
static FLASHCARD_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:\*{0,2}question\b[^:\n]*:|\*{0,2}q\d*[:.]|\d+[.)][ \t]|[-*][ \t])")
        .unwrap()
});

// The first structural marker for every other kind: a markdown heading, a
// bullet, a numbered item, or a roman-numeral item.
static STRUCTURE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:#{1,6}[ \t]|\d+[.)][ \t]|[-*][ \t]|[IVXLCDM]+\.[ \t])").unwrap()
});

// A conversational closing remark. Only matches within the final paragraph
// are acted on, so body text mentioning "if you have any ..." survives.
static CLOSING_REMARK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^[ \t]*(?:i hope (?:this|these)\b|hope (?:this|these) help|let me know if\b|feel free to\b|if you (?:have any|need)\b|would you like me to\b|good luck\b)",
    )
    .unwrap()
});

static MULTI_NEWLINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Strips conversational preamble and postamble from raw model output and
/// normalizes whitespace. Same input always yields the same output.
pub fn normalize(raw: &str, kind: OutputKind) -> String {
    let mut text = raw.replace("\r\n", "\n").trim().to_string();

    // Pass 1: strip known leading phrases to a fixpoint. Every pattern is
    // anchored and consumes at least one character, so this terminates.
    loop {
        let mut stripped = false;
        for pattern in LEADING_PHRASES.iter() {
            if let Some(m) = pattern.find(&text) {
                text = text[m.end()..].trim_start().to_string();
                stripped = true;
            }
        }
        if !stripped {
            break;
        }
    }

    // Pass 2: if recognizable structure starts after position 0, drop the
    // remaining (unrecognized) preamble in front of it.
    let marker = match kind {
        OutputKind::Flashcards => &*FLASHCARD_MARKER,
        _ => &*STRUCTURE_MARKER,
    };
    if let Some(m) = marker.find(&text) {
        if m.start() > 0 {
            text = text[m.start()..].to_string();
        }
    }

    // Pass 3: drop trailing paragraphs opening with a closing remark. The
    // search is restricted to the final paragraph and repeats, so stacked
    // sign-offs go while an earlier paragraph mentioning one stays.
    loop {
        let trimmed_len = text.trim_end().len();
        text.truncate(trimmed_len);
        let para_start = text.rfind("\n\n").map(|i| i + 2).unwrap_or(0);
        match CLOSING_REMARK.find(&text[para_start..]) {
            Some(m) => text.truncate(para_start + m.start()),
            None => break,
        }
    }

    // Pass 4: collapse runs of blank lines and trim.
    let text = MULTI_NEWLINE.replace_all(&text, "\n\n");
    text.trim().to_string()
}
