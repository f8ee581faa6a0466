//! Section representation for parsed Markdown documents.
//!
//! A section represents a hierarchical division of a document, typically
//! corresponding to an ATX heading. Sections live in a flat, `start_line`
//! ordered arena; hierarchy is expressed through indices into that arena so a
//! parent never owns its children and the tree cannot form cycles.

use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// An inline `[text](url)` reference found in a section body.
pub struct Link {
    /// Visible link text.
    pub text: String,
    /// Link target as written.
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// Hierarchical document division with 1-based inclusive line coordinates.
pub struct Section {
    /// Section heading text without markup symbols.
    pub title: String,
    /// Nesting depth in the document hierarchy (1 for top-level, at most 6).
    pub level: usize,
    /// Line holding the heading (or the first line of a virtual section).
    pub start_line: usize,
    /// Last line belonging to the section, inclusive.
    pub end_line: usize,
    /// Name of the file the section was read from.
    pub original_file: String,
    /// Index of the containing section in the arena.
    pub parent_index: Option<usize>,
    /// Indices of directly nested subsections.
    pub children_indices: Vec<usize>,
    /// Ancestor titles joined with `" > "`.
    pub path: String,
    /// First paragraph after the heading, clipped to 100 characters.
    pub summary: Option<String>,
    /// Bold spans found in the section body.
    pub keywords: BTreeSet<String>,
    /// Links found in the section body, in document order.
    pub links: Vec<Link>,
    /// Word count, or non-whitespace character count for CJK text.
    pub word_count: usize,
    /// Identifier assigned once parsing has finished.
    pub id: Option<String>,
    /// Relative path of the emitted part file, set by the part writer.
    pub part_file: Option<String>,
    /// Whether this section was synthesised by refinement.
    pub is_subsplit: bool,
    /// Provenance of a virtual section.
    pub note: Option<String>,
    /// Display title of a virtual section.
    pub subsplit_title: Option<String>,
}

impl Section {
    #[must_use]
    /// Creates a heading-backed section with empty hierarchy and metadata.
    pub fn new(
        title: impl Into<String>,
        level: usize,
        start_line: usize,
        end_line: usize,
        original_file: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            level,
            start_line,
            end_line,
            original_file: original_file.into(),
            parent_index: None,
            children_indices: Vec::new(),
            path: String::new(),
            summary: None,
            keywords: BTreeSet::new(),
            links: Vec::new(),
            word_count: 0,
            id: None,
            part_file: None,
            is_subsplit: false,
            note: None,
            subsplit_title: None,
        }
    }

    #[must_use]
    /// Name used when composing paths and virtual section titles.
    pub fn display_name(&self) -> &str {
        &self.title
    }

    #[must_use]
    /// Line span formatted as `L<start>–L<end>`.
    pub fn line_range(&self) -> String {
        format!("L{}\u{2013}L{}", self.start_line, self.end_line)
    }

    #[must_use]
    /// Number of lines covered by the section.
    pub fn line_count(&self) -> usize {
        (self.end_line + 1).saturating_sub(self.start_line)
    }
}
