//! MAP.json: machine-readable section map with part checksums.

use super::{Document, Format};
use crate::error::Result;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Renders the JSON map.
pub struct MapFormat;

#[derive(Debug, Serialize)]
/// One MAP.json entry.
pub struct MapEntry<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Section id, when assigned.
    pub id: Option<&'a str>,
    /// Section title.
    pub section: &'a str,
    /// Heading level.
    pub level: usize,
    /// Ancestor path.
    pub path: &'a str,
    /// Source file name.
    pub original_file: &'a str,
    /// First source line.
    pub original_start_line: usize,
    /// Last source line.
    pub original_end_line: usize,
    /// Word or CJK character count.
    pub word_count: usize,
    /// Part file relative to the output directory.
    pub part_file: &'a str,
    /// SHA-256 of the part file contents, lowercase hex.
    pub checksum: String,
}

/// Lowercase hex SHA-256 of `content`.
#[must_use]
pub fn checksum(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

impl Format for MapFormat {
    fn file_name(&self) -> &'static str {
        "MAP.json"
    }

    fn render(&self, document: &Document<'_>) -> Result<String> {
        let contents: HashMap<&str, &str> = document
            .parts
            .iter()
            .map(|part| (part.relative_path.as_str(), part.content.as_str()))
            .collect();

        let entries: Vec<MapEntry<'_>> = document
            .sections
            .iter()
            .filter_map(|section| {
                let part_file = section.part_file.as_deref()?;
                Some(MapEntry {
                    id: section.id.as_deref(),
                    section: &section.title,
                    level: section.level,
                    path: &section.path,
                    original_file: &section.original_file,
                    original_start_line: section.start_line,
                    original_end_line: section.end_line,
                    word_count: section.word_count,
                    part_file,
                    checksum: contents
                        .get(part_file)
                        .map(|content| checksum(content))
                        .unwrap_or_default(),
                })
            })
            .collect();

        let mut json = serde_json::to_string_pretty(&entries)?;
        json.push('\n');
        Ok(json)
    }
}

#[cfg(test)]
#[path = "../tests/map.rs"]
mod tests;
