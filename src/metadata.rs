//! Per-section metadata: summary, keywords, links and word counts.

use crate::headings::{fence_marker, parse_heading};
use crate::section::{Link, Section};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Longest summary kept, in characters.
pub const SUMMARY_MAX_CHARS: usize = 100;

static LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static BOLD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("valid bold regex"));

/// Whether the character is a common CJK ideograph or Japanese kana.
#[inline]
#[must_use]
pub fn is_cjk_char(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{309F}' // Hiragana
        | '\u{30A0}'..='\u{30FF}' // Katakana
        | '\u{4E00}'..='\u{9FFF}' // CJK Unified Ideographs
    )
}

/// Whether any character of the text is CJK.
#[must_use]
pub fn has_cjk(text: &str) -> bool {
    text.chars().any(is_cjk_char)
}

/// Counts words, or non-whitespace characters when the text contains CJK.
///
/// Heading markers and fence lines are ignored.
#[must_use]
pub fn count_words(text: &str) -> usize {
    let cleaned: Vec<&str> = text
        .lines()
        .filter(|line| fence_marker(line.trim_end()).is_none())
        .map(strip_heading_marker)
        .collect();

    if cleaned.iter().any(|line| has_cjk(line)) {
        cleaned
            .iter()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).count())
            .sum()
    } else {
        cleaned
            .iter()
            .map(|line| line.split_whitespace().count())
            .sum()
    }
}

fn strip_heading_marker(line: &str) -> &str {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    if (1..=6).contains(&hashes) && line[hashes..].starts_with(char::is_whitespace) {
        line[hashes..].trim_start()
    } else {
        line
    }
}

/// Counts the text of the inclusive 1-based line range.
#[must_use]
pub fn count_range<S: AsRef<str>>(lines: &[S], start_line: usize, end_line: usize) -> usize {
    count_words(&join_range(lines, start_line, end_line))
}

/// Joins the inclusive 1-based line range with newlines.
#[must_use]
pub fn join_range<S: AsRef<str>>(lines: &[S], start_line: usize, end_line: usize) -> String {
    let end = end_line.min(lines.len());
    let start = start_line.max(1);
    if start > end {
        return String::new();
    }
    lines[start - 1..end]
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extracts the first paragraph of the given lines as a one-line summary.
///
/// The paragraph ends at the first blank line after content, at a heading,
/// or at a fence. Bold markers are dropped and long summaries are clipped
/// with an ellipsis.
#[must_use]
pub fn extract_summary<S: AsRef<str>>(lines: &[S]) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();

    for line in lines {
        let stripped = line.as_ref().trim();
        if stripped.is_empty() {
            if parts.is_empty() {
                continue;
            }
            break;
        }
        if stripped.starts_with('#') || fence_marker(stripped).is_some() {
            break;
        }
        parts.push(stripped);
    }

    if parts.is_empty() {
        return None;
    }

    let joined = parts.join(" ");
    let summary = BOLD_PATTERN.replace_all(&joined, "$1");
    if summary.chars().count() > SUMMARY_MAX_CHARS {
        let clipped: String = summary.chars().take(SUMMARY_MAX_CHARS - 3).collect();
        Some(format!("{clipped}..."))
    } else {
        Some(summary.into_owned())
    }
}

/// Bold spans of the text, deduplicated.
#[must_use]
pub fn extract_keywords(text: &str) -> BTreeSet<String> {
    BOLD_PATTERN
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// `[text](url)` links of the text in document order.
#[must_use]
pub fn extract_links(text: &str) -> Vec<Link> {
    LINK_PATTERN
        .captures_iter(text)
        .map(|caps| Link {
            text: caps[1].to_string(),
            url: caps[2].to_string(),
        })
        .collect()
}

/// Fills summary, keywords, links and word count from the section's lines.
pub fn extract_section_info<S: AsRef<str>>(section: &mut Section, lines: &[S]) {
    let end = section.end_line.min(lines.len());
    let start = section.start_line.max(1);
    let body: &[S] = if start <= end { &lines[start - 1..end] } else { &[] };

    let skip_heading = body
        .first()
        .is_some_and(|first| parse_heading(first.as_ref()).is_some());
    let summary_lines = if skip_heading { &body[1..] } else { body };
    section.summary = extract_summary(summary_lines);

    let text = join_range(lines, section.start_line, section.end_line);
    section.links = extract_links(&text);
    section.keywords = extract_keywords(&text);
    section.word_count = count_words(&text);
}

#[cfg(test)]
#[path = "tests/metadata.rs"]
mod tests;
