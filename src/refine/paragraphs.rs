//! Paragraph splitting and the deterministic threshold chunkers.

/// Inclusive 1-based `(start_line, end_line)` pair.
pub type LineSpan = (usize, usize);

/// Splits the inclusive line range into maximal runs of non-blank lines.
#[must_use]
pub fn split_paragraphs<S: AsRef<str>>(lines: &[S], start_line: usize, end_line: usize) -> Vec<LineSpan> {
    let end_line = end_line.min(lines.len());
    let is_blank = |number: usize| lines[number - 1].as_ref().trim().is_empty();

    let mut paragraphs = Vec::new();
    let mut number = start_line.max(1);
    while number <= end_line {
        if is_blank(number) {
            number += 1;
            continue;
        }
        let start = number;
        while number <= end_line && !is_blank(number) {
            number += 1;
        }
        paragraphs.push((start, number - 1));
    }
    paragraphs
}

/// Groups paragraphs, cutting after each boundary index.
///
/// A boundary `i` separates paragraph `i` from paragraph `i + 1`. Boundaries
/// that are out of range or not increasing are ignored.
#[must_use]
pub fn chunks_from_boundaries(paragraphs: &[LineSpan], boundaries: &[usize]) -> Vec<Vec<LineSpan>> {
    let mut sorted = boundaries.to_vec();
    sorted.sort_unstable();

    let mut chunks = Vec::new();
    let mut previous = 0;
    for boundary in sorted {
        if boundary < previous || boundary + 1 >= paragraphs.len() {
            continue;
        }
        chunks.push(paragraphs[previous..=boundary].to_vec());
        previous = boundary + 1;
    }
    if previous < paragraphs.len() {
        chunks.push(paragraphs[previous..].to_vec());
    }
    chunks
}

/// Greedily packs paragraphs into at most `target_parts` groups of roughly
/// `ceil(total / target_parts)` size each.
#[must_use]
pub fn chunk_paragraphs_by_threshold(
    paragraphs: &[LineSpan],
    counts: &[usize],
    total: usize,
    target_parts: usize,
) -> Vec<Vec<LineSpan>> {
    let target_parts = target_parts.max(1);
    let per_part = total.div_ceil(target_parts).max(1);

    let mut chunks: Vec<Vec<LineSpan>> = Vec::new();
    let mut current: Vec<LineSpan> = Vec::new();
    let mut current_count = 0;

    for (&paragraph, &count) in paragraphs.iter().zip(counts) {
        if !current.is_empty()
            && current_count + count > per_part
            && chunks.len() < target_parts - 1
        {
            chunks.push(std::mem::take(&mut current));
            current_count = 0;
        }
        current.push(paragraph);
        current_count += count;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Splits the inclusive line range into `target_parts` near-equal pieces.
///
/// A trailing remainder smaller than half a piece is merged into the piece
/// before it. Every piece holds at least one line.
#[must_use]
pub fn chunk_lines_by_threshold(start_line: usize, end_line: usize, target_parts: usize) -> Vec<LineSpan> {
    if start_line > end_line {
        return Vec::new();
    }
    let target_parts = target_parts.max(1);
    let total_lines = end_line - start_line + 1;
    let per_part = total_lines.div_ceil(target_parts).max(1);

    let mut spans = Vec::new();
    let mut current = start_line;
    while current <= end_line {
        let mut last = (current + per_part - 1).min(end_line);
        if spans.len() == target_parts - 1 || end_line - last < per_part / 2 {
            last = end_line;
        }
        spans.push((current, last));
        current = last + 1;
    }
    spans
}

/// Converts paragraph groups into spans that tile `start_line..=end_line`.
///
/// Each group starts at its first paragraph and runs up to the line before
/// the next group; blank lines between groups go to the earlier group. The
/// first span starts at `start_line` and the last ends at `end_line`.
#[must_use]
pub fn tile_groups(groups: &[Vec<LineSpan>], start_line: usize, end_line: usize) -> Vec<LineSpan> {
    let starts: Vec<usize> = groups
        .iter()
        .filter_map(|group| group.first().map(|&(start, _)| start))
        .collect();

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let first = if i == 0 { start_line } else { start };
            let last = starts.get(i + 1).map_or(end_line, |&next| next - 1);
            (first, last)
        })
        .collect()
}

#[cfg(test)]
#[path = "../tests/paragraphs.rs"]
mod tests;
