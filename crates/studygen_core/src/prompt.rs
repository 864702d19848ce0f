//! crates/studygen_core/src/prompt.rs
//!
//! Builds the fixed instruction templates sent to the generation API, one per
//! output kind, with the extracted document text embedded and truncated to a
//! length budget.

use crate::domain::OutputKind;

/// The maximum number of document characters embedded into a prompt.
pub const MAX_DOCUMENT_CHARS: usize = 12_000;

/// Appended whenever the document text exceeds [`MAX_DOCUMENT_CHARS`].
pub const TRUNCATION_MARKER: &str = "\n\n[Document truncated for length.]";

const SUMMARY_TEMPLATE: &str = r#"Write a clear, well-organized summary of the following document.

Requirements:
- Start with a short markdown heading naming the topic.
- Cover every major idea in the document, in the document's order.
- Use short paragraphs; use markdown headings for major topic changes.
- Do not add information that is not in the document.

DOCUMENT:
{document}"#;

const POINTS_TEMPLATE: &str = r#"Extract the key points from the following document.

Requirements:
- Optionally begin with one or two sentences of introduction.
- Then list the key points as dash bullets, one point per bullet.
- Each bullet should be a complete, self-contained statement.
- Cover the whole document, most important points first within each topic.

DOCUMENT:
{document}"#;

const FLASHCARDS_TEMPLATE: &str = r#"Create a deck of study flashcards from the following document.

Requirements:
- Produce 10 to 15 flashcards covering the most important facts and concepts.
- Format every card exactly as:
Question: <the question>
Answer: <the answer>
- Separate cards with a blank line.
- Questions must be answerable from the document alone.

DOCUMENT:
{document}"#;

const QUIZ_TEMPLATE: &str = r#"Create a practice quiz from the following document.

Requirements:
- Write 8 to 12 numbered multiple-choice questions.
- Give four options (A-D) per question.
- After the options, state the correct answer as "Answer: <letter>".
- Every question must be answerable from the document alone.

DOCUMENT:
{document}"#;

const OUTLINE_TEMPLATE: &str = r#"Create a hierarchical study outline of the following document.

Requirements:
- Use roman numerals (I., II., ...) for top-level sections.
- Use capital letters (A., B., ...) for subtopics within a section.
- Use numbers (1., 2., ...) for detail points within a subtopic.
- Keep titles short; keep detail points to one line each.

DOCUMENT:
{document}"#;

/// Truncates document text to the prompt length budget, appending a marker
/// when anything was cut. Operates on characters, not bytes, so multi-byte
/// input can never be split mid-character.
pub fn truncate_document(text: &str) -> String {
    if text.chars().count() <= MAX_DOCUMENT_CHARS {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(MAX_DOCUMENT_CHARS).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}

/// Builds the full instruction prompt for the requested output kind.
pub fn build_prompt(kind: OutputKind, document_text: &str) -> String {
    let template = match kind {
        OutputKind::Summary => SUMMARY_TEMPLATE,
        OutputKind::Points => POINTS_TEMPLATE,
        OutputKind::Flashcards => FLASHCARDS_TEMPLATE,
        OutputKind::Quiz => QUIZ_TEMPLATE,
        OutputKind::Outline => OUTLINE_TEMPLATE,
    };
    template.replace("{document}", &truncate_document(document_text))
}
