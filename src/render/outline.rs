//! Plain-text outline of a parsed paper.

use std::fmt::Write;

use crate::model::ParsedDocument;

/// Indentation per nesting level.
const INDENT: &str = "  ";

/// Render the document header and an indented section tree.
///
/// ```text
/// Title: Graph Parsing
/// Authors: Ann Lee, Ben Kim
///
/// 1 Introduction
///   1.1 Motivation
/// 2 Method
/// ```
pub fn to_outline(doc: &ParsedDocument) -> String {
    let mut out = String::new();

    if !doc.title.is_empty() {
        let _ = writeln!(out, "Title: {}", doc.title);
    }
    if !doc.authors.is_empty() {
        let _ = writeln!(out, "Authors: {}", doc.authors.join(", "));
    }
    if !doc.keywords.is_empty() {
        let _ = writeln!(out, "Keywords: {}", doc.keywords.join(", "));
    }
    if !out.is_empty() && !doc.sections.is_empty() {
        out.push('\n');
    }

    for section in &doc.sections {
        let depth = section.level.saturating_sub(1) as usize;
        let _ = writeln!(out, "{}{}", INDENT.repeat(depth), section.heading());
    }

    out
}
