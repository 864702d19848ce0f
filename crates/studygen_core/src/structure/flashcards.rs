//! crates/studygen_core/src/structure/flashcards.rs
//!
//! Segments cleaned model output into question/answer flashcards.
//!
//! Three pattern families are tried in sequence, each scanning the whole text
//! for non-overlapping matches: long `Question:`/`Answer:` labels, short
//! `Q:`/`A:` labels, and numbered items followed by an answer label. Output
//! order is discovery order, first family exhausted before the next begins.
//! A card matched by more than one family appears more than once; that is the
//! accepted behavior, not corrected here.

use crate::domain::Flashcard;
use regex::Regex;
use std::sync::LazyLock;

// Family 1: "Question [n]: ... Answer [n]: ...", answer running to the next
// question label or end of input.
static LABELED_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)\*{0,2}question\s*\d*\s*[:.]\*{0,2}\s*(.+?)\s*\*{0,2}answer\s*\d*\s*[:.]\*{0,2}\s*(.+?)(?=\n\s*\*{0,2}question\s*\d*\s*[:.]|\z)",
    )
    .unwrap()
});

// Family 2: short "Q:" on one line, "A:" below it.
static SHORT_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ims)^\s*\*{0,2}q\s*\d*\s*[:.]\*{0,2}\s*([^\n]+?)\s*\n\s*\*{0,2}a\s*\d*\s*[:.]\*{0,2}\s*(.+?)(?=\n\s*\*{0,2}q\s*\d*\s*[:.]|\z)",
    )
    .unwrap()
});

// Family 3: a numbered item as the question, an answer label on the
// following line.
static NUMBERED_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ims)^\s*\d+[.)]\s*([^\n]+?)\s*\n\s*\*{0,2}(?:answer|a)\s*[:.]\*{0,2}\s*(.+?)(?=\n\s*\d+[.)]|\z)",
    )
    .unwrap()
});

// Fallback: a blank-line-separated block holding both labels inline.
static INLINE_BLOCK_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)^\s*\*{0,2}q(?:uestion)?\s*\d*\s*[:.]\*{0,2}\s*(.+?)\s*\*{0,2}a(?:nswer)?\s*\d*\s*[:.]\*{0,2}\s*(.+)$",
    )
    .unwrap()
});

static BLANK_LINE_SPLIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

fn clean_field(raw: &str) -> String {
    raw.trim().trim_matches('*').trim().to_string()
}

// A candidate pair survives only when both sides carry real text after the
// labels are stripped.
fn accept(question: &str, answer: &str) -> Option<Flashcard> {
    let question = clean_field(question);
    let answer = clean_field(answer);
    if question.len() > 2 && answer.len() > 1 {
        Some(Flashcard { question, answer })
    } else {
        None
    }
}

/// Extracts flashcards from cleaned text. Returns an empty vec when nothing
/// in the text resembles a question/answer pair.
pub fn extract_flashcards(text: &str) -> Vec<Flashcard> {
    let mut cards = Vec::new();

    for family in [&*LABELED_PAIR, &*SHORT_PAIR, &*NUMBERED_PAIR] {
        for caps in family.captures_iter(text) {
            if let Some(card) = accept(&caps[1], &caps[2]) {
                cards.push(card);
            }
        }
    }

    if cards.is_empty() {
        // Last resort: test each blank-line block for an inline pair.
        for block in BLANK_LINE_SPLIT.split(text) {
            if let Some(caps) = INLINE_BLOCK_PAIR.captures(block.trim()) {
                if let Some(card) = accept(&caps[1], &caps[2]) {
                    cards.push(card);
                }
            }
        }
    }

    cards
}
