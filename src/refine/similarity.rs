//! Boundary selection by lexical overlap between consecutive paragraphs.
//!
//! Each paragraph is reduced to its set of noun surfaces; the places where
//! neighbouring paragraphs share the fewest nouns are taken as topic shifts.

use super::paragraphs::{
    chunk_paragraphs_by_threshold, chunks_from_boundaries, split_paragraphs, tile_groups,
};
use super::{OwnContent, Proposal, SplitKind};
use crate::diagnostics::Diagnostics;
use crate::metadata::{count_range, join_range};
use crate::section::Section;
use crate::tokenizer::MorphTokenizer;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

#[derive(Clone, Copy, Debug)]
/// Exact Jaccard ratio `shared / total`, compared by value.
pub struct Similarity {
    /// Size of the intersection.
    pub shared: usize,
    /// Size of the union.
    pub total: usize,
}

impl Similarity {
    /// Both sets empty.
    pub const IDENTICAL: Self = Self { shared: 1, total: 1 };
    /// Exactly one set empty.
    pub const DISJOINT: Self = Self { shared: 0, total: 1 };
}

impl PartialEq for Similarity {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Similarity {}

impl Ord for Similarity {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.shared * other.total).cmp(&(other.shared * self.total))
    }
}

impl PartialOrd for Similarity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Similarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.shared, self.total)
    }
}

/// Jaccard similarity of two noun sets.
#[must_use]
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> Similarity {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Similarity::IDENTICAL,
        (true, false) | (false, true) => Similarity::DISJOINT,
        (false, false) => Similarity {
            shared: a.intersection(b).count(),
            total: a.union(b).count(),
        },
    }
}

/// Picks up to `target_parts - 1` paragraph boundaries with the lowest
/// similarity, returned in ascending order. Ties keep document order.
#[must_use]
pub fn select_boundaries(noun_sets: &[BTreeSet<String>], target_parts: usize) -> Vec<usize> {
    let mut scores: Vec<(usize, Similarity)> = noun_sets
        .windows(2)
        .enumerate()
        .map(|(i, pair)| (i, jaccard(&pair[0], &pair[1])))
        .collect();

    let splits = target_parts.saturating_sub(1).min(scores.len());
    if splits == 0 {
        return Vec::new();
    }

    scores.sort_by(|a, b| a.1.cmp(&b.1));
    let mut boundaries: Vec<usize> = scores[..splits].iter().map(|&(i, _)| i).collect();
    boundaries.sort_unstable();
    boundaries
}

/// Splits a section's own content at its weakest topical joins.
pub struct ParagraphSimilarityRefiner {
    tokenizer: Box<dyn MorphTokenizer>,
}

impl ParagraphSimilarityRefiner {
    #[must_use]
    /// Uses `tokenizer` to find paragraph nouns.
    pub fn new(tokenizer: Box<dyn MorphTokenizer>) -> Self {
        Self { tokenizer }
    }

    fn noun_sets<S: AsRef<str>>(
        &self,
        lines: &[S],
        paragraphs: &[(usize, usize)],
    ) -> Result<Vec<BTreeSet<String>>, crate::tokenizer::TokenizeError> {
        paragraphs
            .iter()
            .map(|&(start, end)| self.tokenizer.nouns(&join_range(lines, start, end)))
            .collect()
    }

    pub(super) fn propose<S: AsRef<str>>(
        &self,
        owner: &Section,
        lines: &[S],
        content: &OwnContent,
        target_parts: usize,
        diagnostics: &mut Diagnostics,
    ) -> Option<Proposal> {
        let paragraphs = split_paragraphs(lines, content.start_line, content.end_line);
        if paragraphs.len() < 2 {
            return None;
        }
        let target_parts = target_parts.min(paragraphs.len());

        let boundaries = match self.noun_sets(lines, &paragraphs) {
            Ok(sets) => select_boundaries(&sets, target_parts),
            Err(err) => {
                diagnostics.warn(format!(
                    "Tokenizer failed for section '{}': {err}; using threshold split",
                    owner.title
                ));
                Vec::new()
            }
        };

        let boundary_groups = chunks_from_boundaries(&paragraphs, &boundaries);
        let (groups, kind) = if boundary_groups.len() >= 2 {
            debug!(
                "Section '{}' split after paragraphs {:?}",
                owner.title, boundaries
            );
            (boundary_groups, SplitKind::Boundary)
        } else {
            let counts: Vec<usize> = paragraphs
                .iter()
                .map(|&(start, end)| count_range(lines, start, end))
                .collect();
            let groups =
                chunk_paragraphs_by_threshold(&paragraphs, &counts, content.size, target_parts);
            (groups, SplitKind::Threshold)
        };

        Some(Proposal {
            spans: tile_groups(&groups, content.start_line, content.end_line),
            titles: Vec::new(),
            kind,
        })
    }
}

#[cfg(test)]
#[path = "../tests/similarity.rs"]
mod tests;
