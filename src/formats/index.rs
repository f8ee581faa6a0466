//! INDEX.md: a human-readable table of contents with per-section details.

use super::{Document, Format};
use crate::error::Result;
use crate::section::Section;
use std::fmt::Write;

/// Renders the Markdown index.
pub struct IndexFormat;

fn id_label(section: &Section) -> String {
    section
        .id
        .as_deref()
        .map_or_else(String::new, |id| format!("[{id}] "))
}

impl Format for IndexFormat {
    fn file_name(&self) -> &'static str {
        "INDEX.md"
    }

    fn render(&self, document: &Document<'_>) -> Result<String> {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(out, "# Index: {}\n", document.input_file);

        if !document.warnings.is_empty() {
            out.push_str("## Warnings\n\n");
            for warning in document.warnings {
                let _ = writeln!(out, "- [WARNING] {warning}");
            }
            out.push('\n');
        }

        out.push_str("## Structure Tree\n\n");
        for section in document.sections {
            let indent = "  ".repeat(section.level.saturating_sub(1));
            let link = section
                .part_file
                .as_deref()
                .map_or_else(String::new, |part| format!("[{part}]({part})"));
            let _ = writeln!(
                out,
                "{indent}- {}{} ({}) \u{2192} {link}",
                id_label(section),
                section.title,
                section.line_range()
            );
        }
        out.push('\n');

        out.push_str("## Section Details\n\n");
        for section in document.sections {
            let _ = writeln!(out, "### {}{} (H{})", id_label(section), section.title, section.level);
            let _ = writeln!(out, "- lines: {}", section.line_range());
            if let Some(summary) = &section.summary {
                let _ = writeln!(out, "- summary: {summary}");
            }
            if !section.keywords.is_empty() {
                let keywords: Vec<&str> = section.keywords.iter().map(String::as_str).collect();
                let _ = writeln!(out, "- keywords: {}", keywords.join(", "));
            }
            if !section.links.is_empty() {
                let links: Vec<String> = section
                    .links
                    .iter()
                    .map(|link| format!("[{}]({})", link.text, link.url))
                    .collect();
                let _ = writeln!(out, "- references: {}", links.join(", "));
            }
            out.push('\n');
        }

        Ok(out)
    }
}

#[cfg(test)]
#[path = "../tests/index.rs"]
mod tests;
