//! Boundary selection delegated to a language model.
//!
//! The model sees the section's own content with 1-based relative line
//! numbers and answers with a JSON array of titled, contiguous groups. Its
//! answer is untrusted: anything short of an exact tiling of the numbered
//! lines is rejected and the section falls back to an equal-size line split.

use super::paragraphs::{chunk_lines_by_threshold, LineSpan};
use super::{OwnContent, Proposal, SplitKind};
use crate::diagnostics::Diagnostics;
use crate::llm::LlmProvider;
use crate::section::Section;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
/// Reasons a model response is rejected.
pub enum ResponseError {
    /// Not a JSON array of groups.
    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The array holds no groups.
    #[error("response contains no groups")]
    Empty,
    /// A group lies outside `1..=total_lines` or ends before it starts.
    #[error("group {start}-{end} is outside lines 1-{total}")]
    OutOfRange {
        /// Relative start line of the group.
        start: i64,
        /// Relative end line of the group.
        end: i64,
        /// Number of numbered lines.
        total: usize,
    },
    /// Groups do not start at line 1 and end at the last line.
    #[error("groups cover lines {first}-{last}, expected 1-{total}")]
    Coverage {
        /// First covered line.
        first: usize,
        /// Last covered line.
        last: usize,
        /// Number of numbered lines.
        total: usize,
    },
    /// Adjacent groups leave a gap or overlap.
    #[error("group ending at line {end} is followed by a group starting at line {next_start}")]
    Discontinuous {
        /// End of the earlier group.
        end: usize,
        /// Start of the following group.
        next_start: usize,
    },
}

#[derive(Debug, Deserialize)]
struct RawGroup {
    #[serde(default)]
    title: Option<String>,
    start_line: i64,
    end_line: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A validated group in relative line numbers.
pub struct TitledGroup {
    /// Model-provided title, trimmed; may be empty.
    pub title: String,
    /// First relative line (1-based).
    pub start_line: usize,
    /// Last relative line, inclusive.
    pub end_line: usize,
}

/// Prefixes each line with its right-aligned 1-based number.
#[must_use]
pub fn number_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let width = lines.len().to_string().len().max(4);
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$}: {}", i + 1, line.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Instructions describing the exact response schema.
#[must_use]
pub fn system_prompt(total_lines: usize) -> String {
    format!(
        "# Role\n\
         You analyse the structure of documents.\n\
         \n\
         # Goal\n\
         Split the line-numbered text at topic changes so that semantically related lines stay \
         together, and give every group a short title describing its content.\n\
         \n\
         # Output format\n\
         Return only a JSON array, without explanations or Markdown decoration.\n\
         Each element is an object with the fields:\n\
         - title (string): concise title for the group, in the language of the document\n\
         - start_line (integer): first line number of the group\n\
         - end_line (integer): last line number of the group (inclusive)\n\
         \n\
         Schema:\n\
         [{{\"title\": \"...\", \"start_line\": 1, \"end_line\": ...}}, ...]\n\
         \n\
         # Rules\n\
         - Line numbers are the 1-based numbers shown before each line\n\
         - The first group starts at line 1\n\
         - Each group's start_line equals the previous group's end_line + 1 (no gaps, no overlaps)\n\
         - The last group ends at line {total_lines} (every line is covered)\n"
    )
}

/// Request asking for at most `target_parts` groups of `numbered_text`.
#[must_use]
pub fn user_message(target_parts: usize, numbered_text: &str) -> String {
    format!(
        "Split the following text into at most {target_parts} groups while keeping \
         semantic units intact.\n\n{numbered_text}"
    )
}

/// Removes a surrounding Markdown code fence, if any.
#[must_use]
pub fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let Some(newline) = trimmed.find('\n') else {
        return trimmed;
    };
    let body = &trimmed[newline + 1..];
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parses and strictly validates a model response against `total_lines`.
///
/// # Errors
///
/// Returns the first violation found: malformed JSON, an empty array, a
/// group out of range, incomplete coverage, or a gap/overlap between groups.
pub fn parse_groups(response: &str, total_lines: usize) -> Result<Vec<TitledGroup>, ResponseError> {
    let raw: Vec<RawGroup> = serde_json::from_str(strip_code_fence(response))?;
    if raw.is_empty() {
        return Err(ResponseError::Empty);
    }

    let mut groups = raw
        .into_iter()
        .map(|group| {
            let start = usize::try_from(group.start_line).ok();
            let end = usize::try_from(group.end_line).ok();
            match (start, end) {
                (Some(start), Some(end)) if start >= 1 && end <= total_lines && end >= start => {
                    Ok(TitledGroup {
                        title: group.title.unwrap_or_default().trim().to_string(),
                        start_line: start,
                        end_line: end,
                    })
                }
                _ => Err(ResponseError::OutOfRange {
                    start: group.start_line,
                    end: group.end_line,
                    total: total_lines,
                }),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    groups.sort_by_key(|group| group.start_line);

    let first = groups[0].start_line;
    let last = groups[groups.len() - 1].end_line;
    if first != 1 || last != total_lines {
        return Err(ResponseError::Coverage {
            first,
            last,
            total: total_lines,
        });
    }
    for pair in groups.windows(2) {
        if pair[0].end_line + 1 != pair[1].start_line {
            return Err(ResponseError::Discontinuous {
                end: pair[0].end_line,
                next_start: pair[1].start_line,
            });
        }
    }

    Ok(groups)
}

/// Maps relative groups back to absolute file lines.
#[must_use]
pub fn to_absolute(groups: &[TitledGroup], own_start: usize) -> Vec<LineSpan> {
    groups
        .iter()
        .map(|group| {
            (
                own_start + group.start_line - 1,
                own_start + group.end_line - 1,
            )
        })
        .collect()
}

/// Asks a language model where a section's own content should be split.
pub struct CollaboratorAssistedRefiner {
    provider: Box<dyn LlmProvider>,
}

impl CollaboratorAssistedRefiner {
    #[must_use]
    /// Sends split requests through `provider`.
    pub fn new(provider: Box<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    fn request_groups<S: AsRef<str>>(
        &self,
        owner: &Section,
        lines: &[S],
        content: &OwnContent,
        target_parts: usize,
        diagnostics: &mut Diagnostics,
    ) -> Option<Vec<TitledGroup>> {
        let own_lines = &lines[content.start_line - 1..content.end_line];
        let total_lines = own_lines.len();
        let system = system_prompt(total_lines);
        let user = user_message(target_parts, &number_lines(own_lines));

        debug!(
            "Requesting up to {target_parts} groups for section '{}' ({total_lines} lines)",
            owner.title
        );
        let response = match self.provider.send_message(&system, &user) {
            Ok(response) => response,
            Err(err) => {
                diagnostics.warn(format!(
                    "AI API call failed for section '{}': {err}",
                    owner.title
                ));
                return None;
            }
        };

        match parse_groups(&response, total_lines) {
            Ok(groups) => Some(groups),
            Err(err) => {
                diagnostics.warn(format!(
                    "AI response rejected for section '{}': {err}",
                    owner.title
                ));
                None
            }
        }
    }

    pub(super) fn propose<S: AsRef<str>>(
        &self,
        owner: &Section,
        lines: &[S],
        content: &OwnContent,
        target_parts: usize,
        diagnostics: &mut Diagnostics,
    ) -> Option<Proposal> {
        if content.line_count() < 2 {
            return None;
        }

        if let Some(groups) = self.request_groups(owner, lines, content, target_parts, diagnostics) {
            return Some(Proposal {
                spans: to_absolute(&groups, content.start_line),
                titles: groups.into_iter().map(|group| group.title).collect(),
                kind: SplitKind::Boundary,
            });
        }

        Some(Proposal {
            spans: chunk_lines_by_threshold(content.start_line, content.end_line, target_parts),
            titles: Vec::new(),
            kind: SplitKind::Threshold,
        })
    }
}

#[cfg(test)]
#[path = "../tests/assisted.rs"]
mod tests;
