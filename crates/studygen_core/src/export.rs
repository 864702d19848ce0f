//! crates/studygen_core/src/export.rs
//!
//! Stateless export transforms for generated content: markdown passthrough,
//! an HTML-escaping wrapper for the print path, and a line-by-line
//! heading-level mapper feeding `docx-rs`.

use crate::domain::GeneratedContent;
use crate::ports::{PortError, PortResult};
use docx_rs::{Docx, Paragraph, Run};

/// Markdown/plain-text export is a byte passthrough of the generated text.
pub fn to_markdown(content: &GeneratedContent) -> String {
    content.content.clone()
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// Returns the heading level (1-3) and remaining text for a markdown heading
// line, treating deeper headings as level 3.
fn heading_line(line: &str) -> Option<(usize, &str)> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = line[hashes..].trim();
    if rest.is_empty() {
        return None;
    }
    Some((hashes.min(3), rest))
}

fn bullet_line(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
        .map(str::trim)
}

/// Wraps the generated text in a minimal printable HTML document, escaping
/// every piece of user-controlled text.
pub fn to_html(content: &GeneratedContent) -> String {
    let mut body = String::new();
    for line in content.content.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            continue;
        }
        if let Some((level, text)) = heading_line(line.trim_start()) {
            body.push_str(&format!("<h{level}>{}</h{level}>\n", escape_html(text)));
        } else if let Some(text) = bullet_line(line) {
            body.push_str(&format!("<li>{}</li>\n", escape_html(text)));
        } else {
            body.push_str(&format!("<p>{}</p>\n", escape_html(line.trim())));
        }
    }
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(&content.filename),
        body
    )
}

// Run sizes are in half-points: 36 = 18pt heading, 24 = 12pt body.
fn docx_paragraph(line: &str) -> Paragraph {
    if let Some((level, text)) = heading_line(line.trim_start()) {
        let size = match level {
            1 => 36,
            2 => 32,
            _ => 28,
        };
        Paragraph::new().add_run(Run::new().add_text(text).bold().size(size))
    } else if let Some(text) = bullet_line(line) {
        Paragraph::new().add_run(Run::new().add_text(format!("• {text}")).size(24))
    } else {
        Paragraph::new().add_run(Run::new().add_text(line.trim()).size(24))
    }
}

/// Maps the generated text line by line into a DOCX document and returns the
/// packed bytes.
pub fn to_docx(content: &GeneratedContent) -> PortResult<Vec<u8>> {
    let mut docx = Docx::new().add_paragraph(
        Paragraph::new().add_run(Run::new().add_text(content.filename.as_str()).bold().size(40)),
    );
    for line in content.content.lines() {
        if line.trim().is_empty() {
            docx = docx.add_paragraph(Paragraph::new());
            continue;
        }
        docx = docx.add_paragraph(docx_paragraph(line));
    }

    let mut cursor = std::io::Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| PortError::Unexpected(format!("Failed to build DOCX document: {}", e)))?;
    Ok(cursor.into_inner())
}
