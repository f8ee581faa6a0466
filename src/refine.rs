//! Refinement of over-sized sections into virtual sub-sections.
//!
//! Each heading-backed section is measured over its *own* content, the lines
//! between its heading and its first child. When that content reaches the
//! split threshold, the configured strategy proposes contiguous line spans
//! and the section is followed by one virtual leaf per span. The arena is
//! relinked afterwards so later siblings reattach to the right ancestor.

pub mod assisted;
pub mod paragraphs;
pub mod similarity;

pub use assisted::CollaboratorAssistedRefiner;
pub use similarity::ParagraphSimilarityRefiner;

use crate::diagnostics::Diagnostics;
use crate::error::Md2mapError;
use crate::hierarchy::build_hierarchy;
use crate::llm::LlmProvider;
use crate::metadata::count_range;
use crate::section::Section;
use crate::tokenizer::MorphTokenizer;
use paragraphs::LineSpan;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Deepest heading level a virtual section may take.
pub const MAX_LEVEL: usize = 6;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// How sections are divided beyond their headings.
pub enum SplitMode {
    #[default]
    /// Headings only.
    Heading,
    /// Paragraph similarity over noun sets.
    Nlp,
    /// Boundaries proposed by a language model.
    Ai,
}

impl SplitMode {
    #[must_use]
    /// Name used in options and provenance notes.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Heading => "heading",
            Self::Nlp => "nlp",
            Self::Ai => "ai",
        }
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitMode {
    type Err = Md2mapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heading" => Ok(Self::Heading),
            "nlp" => Ok(Self::Nlp),
            "ai" => Ok(Self::Ai),
            _ => Err(Md2mapError::InvalidOption {
                option: "split_mode",
                value: s.to_string(),
                expected: "heading, nlp, ai",
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Whether spans came from selected boundaries or the size-based fallback.
pub enum SplitKind {
    /// Boundaries chosen by the strategy.
    Boundary,
    /// Near-equal pieces by size.
    Threshold,
}

impl SplitKind {
    #[must_use]
    /// Label written into provenance notes.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Boundary => "boundary",
            Self::Threshold => "threshold",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// A section's own content: its lines up to the first child, and their size.
pub struct OwnContent {
    /// First line after the heading.
    pub start_line: usize,
    /// Last line before the first child (or the section end).
    pub end_line: usize,
    /// Word count, or character count for CJK text.
    pub size: usize,
}

impl OwnContent {
    #[must_use]
    /// Number of lines in the range.
    pub fn line_count(&self) -> usize {
        (self.end_line + 1).saturating_sub(self.start_line)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Spans a strategy wants to cut a section into.
pub struct Proposal {
    /// Contiguous absolute spans tiling the own content.
    pub spans: Vec<LineSpan>,
    /// Titles aligned with `spans`; may be shorter or hold empty strings.
    pub titles: Vec<String>,
    /// How the spans were obtained.
    pub kind: SplitKind,
}

/// Strategy selected once when the parser is built.
pub enum Refiner {
    /// No refinement.
    None,
    /// Split at the weakest lexical joins between paragraphs.
    ParagraphSimilarity(ParagraphSimilarityRefiner),
    /// Split where a language model says topics change.
    CollaboratorAssisted(CollaboratorAssistedRefiner),
}

impl Refiner {
    #[must_use]
    /// Paragraph-similarity strategy over `tokenizer`.
    pub fn paragraph_similarity(tokenizer: Box<dyn MorphTokenizer>) -> Self {
        Self::ParagraphSimilarity(ParagraphSimilarityRefiner::new(tokenizer))
    }

    #[must_use]
    /// Model-assisted strategy over `provider`.
    pub fn collaborator_assisted(provider: Box<dyn LlmProvider>) -> Self {
        Self::CollaboratorAssisted(CollaboratorAssistedRefiner::new(provider))
    }

    #[must_use]
    /// The split mode this strategy implements.
    pub fn mode(&self) -> SplitMode {
        match self {
            Self::None => SplitMode::Heading,
            Self::ParagraphSimilarity(_) => SplitMode::Nlp,
            Self::CollaboratorAssisted(_) => SplitMode::Ai,
        }
    }

    fn propose<S: AsRef<str>>(
        &self,
        owner: &Section,
        lines: &[S],
        content: &OwnContent,
        target_parts: usize,
        diagnostics: &mut Diagnostics,
    ) -> Option<Proposal> {
        match self {
            Self::None => None,
            Self::ParagraphSimilarity(refiner) => {
                refiner.propose(owner, lines, content, target_parts, diagnostics)
            }
            Self::CollaboratorAssisted(refiner) => {
                refiner.propose(owner, lines, content, target_parts, diagnostics)
            }
        }
    }
}

impl fmt::Debug for Refiner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Refiner({})", self.mode())
    }
}

/// Number of parts an over-threshold section is cut into.
#[must_use]
pub fn target_parts(size: usize, split_threshold: usize, max_subsections: usize) -> usize {
    size.div_ceil(split_threshold.max(1))
        .max(2)
        .min(max_subsections)
}

/// Own content line range of `sections[index]`, if it holds any lines.
#[must_use]
pub fn own_content_range(sections: &[Section], index: usize) -> Option<LineSpan> {
    let section = &sections[index];
    let start = section.start_line + 1;
    let end = section
        .children_indices
        .first()
        .map_or(section.end_line, |&child| sections[child].start_line - 1);
    (start <= end).then_some((start, end))
}

/// Builds the virtual leaves for `owner` from a proposal.
///
/// The first span is widened to start at the owner's heading line.
#[must_use]
pub fn build_virtual_sections(owner: &Section, proposal: &Proposal, mode: SplitMode) -> Vec<Section> {
    let level = (owner.level + 1).min(MAX_LEVEL);
    let owner_label = owner.id.as_deref().unwrap_or(&owner.title);

    proposal
        .spans
        .iter()
        .enumerate()
        .map(|(i, &(start, end))| {
            let start = if i == 0 { owner.start_line } else { start };
            let title = proposal
                .titles
                .get(i)
                .map(String::as_str)
                .map(str::trim)
                .filter(|title| !title.is_empty());
            let subsplit_title = match title {
                Some(title) => format!("{}: {title}", owner.display_name()),
                None => format!("{}: part-{}", owner.display_name(), i + 1),
            };

            let mut section = Section::new(
                owner.title.clone(),
                level,
                start,
                end,
                owner.original_file.clone(),
            );
            section.is_subsplit = true;
            section.note = Some(format!(
                "Subsplit of {owner_label} (L{start}\u{2013}L{end}, {mode} {} split)",
                proposal.kind.as_str()
            ));
            section.subsplit_title = Some(subsplit_title);
            section
        })
        .collect()
}

/// Spans are usable when there are at least two, none is empty, and they
/// tile `start..=end` without gaps or overlaps.
fn is_tiling(spans: &[LineSpan], start: usize, end: usize) -> bool {
    spans.len() >= 2
        && spans.first().is_some_and(|&(first, _)| first == start)
        && spans.last().is_some_and(|&(_, last)| last == end)
        && spans.iter().all(|&(s, e)| s <= e)
        && spans.windows(2).all(|pair| pair[0].1 + 1 == pair[1].0)
}

#[derive(Debug)]
/// Orchestrates measurement, strategy dispatch and virtual section creation.
pub struct SectionRefiner {
    refiner: Refiner,
    split_threshold: usize,
    max_subsections: usize,
}

impl SectionRefiner {
    #[must_use]
    /// Refines with `refiner`, splitting own content of at least
    /// `split_threshold` into at most `max_subsections` parts.
    pub fn new(refiner: Refiner, split_threshold: usize, max_subsections: usize) -> Self {
        Self {
            refiner,
            split_threshold: split_threshold.max(1),
            max_subsections: max_subsections.max(1),
        }
    }

    #[must_use]
    /// Whether refinement can change anything.
    pub fn is_active(&self) -> bool {
        !matches!(self.refiner, Refiner::None) && self.max_subsections > 1
    }

    #[must_use]
    /// The configured strategy's split mode.
    pub fn mode(&self) -> SplitMode {
        self.refiner.mode()
    }

    /// Expands `sections` with virtual leaves after each over-sized owner.
    ///
    /// `sections` must already be linked by [`build_hierarchy`]. The result is
    /// relinked and stays ordered by `start_line`.
    #[must_use]
    pub fn refine<S: AsRef<str>>(
        &self,
        sections: Vec<Section>,
        lines: &[S],
        diagnostics: &mut Diagnostics,
    ) -> Vec<Section> {
        if !self.is_active() {
            return sections;
        }

        let mode = self.mode();
        let mut refined = Vec::with_capacity(sections.len());
        let mut split_count = 0;

        for index in 0..sections.len() {
            let virtuals = self.split_section(&sections, index, lines, mode, diagnostics);
            refined.push(sections[index].clone());
            if !virtuals.is_empty() {
                split_count += 1;
                refined.extend(virtuals);
            }
        }

        if split_count > 0 {
            info!("Split {split_count} section(s) using {mode} mode");
        }
        build_hierarchy(&mut refined);
        refined
    }

    fn split_section<S: AsRef<str>>(
        &self,
        sections: &[Section],
        index: usize,
        lines: &[S],
        mode: SplitMode,
        diagnostics: &mut Diagnostics,
    ) -> Vec<Section> {
        let owner = &sections[index];
        if owner.is_subsplit {
            return Vec::new();
        }
        let Some((start_line, end_line)) = own_content_range(sections, index) else {
            return Vec::new();
        };
        let end_line = end_line.min(lines.len());
        if start_line > end_line {
            return Vec::new();
        }

        let size = count_range(lines, start_line, end_line);
        if size < self.split_threshold {
            return Vec::new();
        }

        let parts = target_parts(size, self.split_threshold, self.max_subsections);
        let content = OwnContent {
            start_line,
            end_line,
            size,
        };
        debug!(
            "Section '{}' has {size} units over L{start_line}-L{end_line}; targeting {parts} parts",
            owner.title
        );

        let Some(proposal) = self
            .refiner
            .propose(owner, lines, &content, parts, diagnostics)
        else {
            return Vec::new();
        };
        if !is_tiling(&proposal.spans, start_line, end_line) {
            debug!(
                "Section '{}' left unsplit: {} usable span(s)",
                owner.title,
                proposal.spans.len()
            );
            return Vec::new();
        }

        build_virtual_sections(owner, &proposal, mode)
    }
}

#[cfg(test)]
#[path = "tests/refine.rs"]
mod tests;
