//! The parse routine: headings, hierarchy, refinement and metadata.
//!
//! Nothing in here fails on document content. Structural oddities and
//! collaborator failures become warnings on the returned [`ParseOutcome`];
//! only reading the input file can return an error.

use crate::diagnostics::Diagnostics;
use crate::error::{Md2mapError, Result};
use crate::headings::{check_level_skips, extract_headings};
use crate::hierarchy::build_sections;
use crate::metadata::extract_section_info;
use crate::refine::{Refiner, SectionRefiner};
use crate::section::Section;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info};

/// Deepest ATX heading level.
pub const MAX_HEADING_DEPTH: usize = 6;

/// Default deepest heading level turned into a section.
pub const DEFAULT_MAX_DEPTH: usize = 3;
/// Default own-content size from which a section is refined.
pub const DEFAULT_SPLIT_THRESHOLD: usize = 500;
/// Default cap on virtual sections per owner.
pub const DEFAULT_MAX_SUBSECTIONS: usize = 5;
/// Default section id prefix.
pub const DEFAULT_ID_PREFIX: &str = "MD";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Numeric parse settings, clamped to their valid ranges on construction.
pub struct ParseOptions {
    /// Deepest heading level turned into a section, in `1..=6`.
    pub max_depth: usize,
    /// Own-content size from which a section is refined, at least 1.
    pub split_threshold: usize,
    /// Most virtual sections produced per owner, at least 1.
    pub max_subsections: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            split_threshold: DEFAULT_SPLIT_THRESHOLD,
            max_subsections: DEFAULT_MAX_SUBSECTIONS,
        }
    }
}

impl ParseOptions {
    #[must_use]
    /// Clamps each value into its valid range.
    pub fn new(max_depth: usize, split_threshold: usize, max_subsections: usize) -> Self {
        Self {
            max_depth: max_depth.clamp(1, MAX_HEADING_DEPTH),
            split_threshold: split_threshold.max(1),
            max_subsections: max_subsections.max(1),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
/// Final sections in `start_line` order plus the warnings raised on the way.
pub struct ParseOutcome {
    /// Sections, heading-backed and virtual, linked into a tree.
    pub sections: Vec<Section>,
    /// Human-readable advisories; none of them is fatal.
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Decoded input lines plus the names derived from its path.
pub struct SourceDocument {
    /// File name recorded as `original_file`.
    pub file_name: String,
    /// File stem, the title of a heading-less document.
    pub stem: String,
    /// Lines without their terminators.
    pub lines: Vec<String>,
    /// Advisories raised while decoding.
    pub warnings: Vec<String>,
}

impl SourceDocument {
    /// Reads `path`, replacing invalid UTF-8 with U+FFFD.
    ///
    /// # Errors
    ///
    /// Returns [`Md2mapError::NotFound`] if `path` does not exist, or an I/O
    /// error if it cannot be read.
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => Md2mapError::NotFound(path.to_path_buf()),
            _ => Md2mapError::io(path, source),
        })?;

        let mut diagnostics = Diagnostics::new();
        let text = String::from_utf8_lossy(&bytes);
        if text.contains('\u{FFFD}') {
            diagnostics.warn(format!(
                "File contains invalid UTF-8 characters: {}",
                path.display()
            ));
        }
        info!("Parsing: {}", path.display());

        Ok(Self {
            file_name: path
                .file_name()
                .map_or_else(String::new, |name| name.to_string_lossy().into_owned()),
            stem: path
                .file_stem()
                .map_or_else(String::new, |stem| stem.to_string_lossy().into_owned()),
            lines: text.lines().map(str::to_string).collect(),
            warnings: diagnostics.into_warnings(),
        })
    }
}

/// Markdown document parser with a refinement strategy fixed at construction.
#[derive(Debug)]
pub struct MarkdownParser {
    options: ParseOptions,
    refiner: SectionRefiner,
}

impl MarkdownParser {
    #[must_use]
    /// Builds a parser; `refiner` is only consulted for over-sized sections.
    pub fn new(options: ParseOptions, refiner: Refiner) -> Self {
        Self {
            options,
            refiner: SectionRefiner::new(
                refiner,
                options.split_threshold,
                options.max_subsections,
            ),
        }
    }

    #[must_use]
    /// Settings in effect.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parses already-decoded lines.
    ///
    /// `file_name` is recorded as every section's `original_file`; `stem`
    /// titles the single section returned when the document has no headings.
    #[must_use]
    pub fn parse_lines<S: AsRef<str>>(&self, lines: &[S], file_name: &str, stem: &str) -> ParseOutcome {
        let mut diagnostics = Diagnostics::new();
        let sections = self.parse_with(lines, file_name, stem, &mut diagnostics);
        ParseOutcome {
            sections,
            warnings: diagnostics.into_warnings(),
        }
    }

    /// Parses a document read by [`SourceDocument::read`], keeping its
    /// read warnings ahead of the parse warnings.
    #[must_use]
    pub fn parse_document(&self, document: &SourceDocument) -> ParseOutcome {
        let mut diagnostics = Diagnostics::new();
        diagnostics.extend(document.warnings.iter().cloned());
        let sections = self.parse_with(
            &document.lines,
            &document.file_name,
            &document.stem,
            &mut diagnostics,
        );
        ParseOutcome {
            sections,
            warnings: diagnostics.into_warnings(),
        }
    }

    /// Reads and parses a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or unreadable.
    pub fn parse_file(&self, path: &Path) -> Result<ParseOutcome> {
        Ok(self.parse_document(&SourceDocument::read(path)?))
    }

    fn parse_with<S: AsRef<str>>(
        &self,
        lines: &[S],
        file_name: &str,
        stem: &str,
        diagnostics: &mut Diagnostics,
    ) -> Vec<Section> {
        let headings = extract_headings(lines, self.options.max_depth);
        debug!("Found {} heading(s) in {file_name}", headings.len());

        if headings.is_empty() {
            diagnostics.warn("No headings found in the document");
            let mut section = Section::new(stem, 1, 1, lines.len().max(1), file_name);
            section.path = stem.to_string();
            extract_section_info(&mut section, lines);
            return vec![section];
        }

        check_level_skips(&headings, diagnostics);

        let sections = build_sections(&headings, lines.len(), file_name);
        let mut sections = self.refiner.refine(sections, lines, diagnostics);

        for section in &mut sections {
            extract_section_info(section, lines);
        }
        sections
    }
}

/// Numbers sections in output order as `<prefix>1`, `<prefix>2`, ...
pub fn assign_ids(sections: &mut [Section], prefix: &str) {
    for (i, section) in sections.iter_mut().enumerate() {
        section.id = Some(format!("{prefix}{}", i + 1));
    }
}

#[cfg(test)]
#[path = "tests/parser.rs"]
mod tests;
