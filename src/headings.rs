//! ATX heading detection.
//!
//! Headings are recognised line by line with a three-state scanner: front
//! matter at the top of the file and fenced code blocks both hide `#` lines
//! that would otherwise read as headings.

use crate::diagnostics::Diagnostics;

#[derive(Clone, Debug, PartialEq, Eq)]
/// A heading occurrence in document order.
pub struct Heading {
    /// Number of leading `#` characters (1-6).
    pub level: usize,
    /// Heading text, trimmed.
    pub title: String,
    /// 1-based line number of the heading.
    pub line: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Scanner state while walking the document.
pub enum ScanState {
    /// Ordinary Markdown; headings are recognised.
    Normal,
    /// Inside a leading `---` delimited metadata block.
    FrontMatter,
    /// Inside a fenced code block opened with the given marker character.
    CodeFence(char),
}

/// Returns the fence marker character if the line opens or closes a fence.
///
/// A fence is a run of at least three backticks or tildes at the very start of
/// the line.
#[must_use]
pub fn fence_marker(line: &str) -> Option<char> {
    let first = line.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }
    let run = line.chars().take_while(|&c| c == first).count();
    (run >= 3).then_some(first)
}

/// Parses an ATX heading line into `(level, title)`.
#[must_use]
pub fn parse_heading(line: &str) -> Option<(usize, String)> {
    let line = line.trim_end();
    let level = line.chars().take_while(|&c| c == '#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let rest = &line[level..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let title = rest.trim();
    if title.is_empty() {
        return None;
    }
    Some((level, title.to_string()))
}

fn is_front_matter_delimiter(line: &str) -> bool {
    line.trim_end() == "---"
}

/// Collects headings up to `max_depth`, skipping front matter and code fences.
#[must_use]
pub fn extract_headings<S: AsRef<str>>(lines: &[S], max_depth: usize) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut state = ScanState::Normal;

    for (index, line) in lines.iter().enumerate() {
        let number = index + 1;
        let stripped = line.as_ref().trim_end();

        match state {
            ScanState::FrontMatter => {
                if is_front_matter_delimiter(stripped) {
                    state = ScanState::Normal;
                }
                continue;
            }
            ScanState::CodeFence(open) => {
                if fence_marker(stripped) == Some(open) {
                    state = ScanState::Normal;
                }
                continue;
            }
            ScanState::Normal => {}
        }

        if number == 1 && is_front_matter_delimiter(stripped) {
            state = ScanState::FrontMatter;
            continue;
        }

        if let Some(marker) = fence_marker(stripped) {
            state = ScanState::CodeFence(marker);
            continue;
        }

        if let Some((level, title)) = parse_heading(stripped) {
            if level <= max_depth {
                headings.push(Heading {
                    level,
                    title,
                    line: number,
                });
            }
        }
    }

    headings
}

/// Warns about every heading that jumps more than one level deeper than its
/// predecessor. The structure itself is left untouched.
pub fn check_level_skips(headings: &[Heading], diagnostics: &mut Diagnostics) {
    for pair in headings.windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);
        if current.level > previous.level + 1 {
            diagnostics.warn(format!(
                "Heading level skipped from H{} to H{} at line {}: {}",
                previous.level, current.level, current.line, current.title
            ));
        }
    }
}

#[cfg(test)]
#[path = "tests/headings.rs"]
mod tests;
