//! Format trait and implementations for the files written next to the parts.
//!
//! This module defines the `Format` trait which abstracts over the different
//! listings generated from a parsed document (the Markdown index and the JSON
//! map), plus the part-file naming and header rules they both refer to.

pub mod index;
pub mod map;
pub mod parts;

use crate::error::Result;
use crate::section::Section;
use parts::Part;

/// Everything a format needs to render one document.
pub struct Document<'a> {
    /// Input file name as shown to readers.
    pub input_file: &'a str,
    /// Final sections with ids and part files assigned.
    pub sections: &'a [Section],
    /// Warnings collected while reading and parsing.
    pub warnings: &'a [String],
    /// Rendered part files, one per section.
    pub parts: &'a [Part],
}

/// A listing rendered from a [`Document`] into a single file.
pub trait Format {
    /// File name relative to the output directory.
    fn file_name(&self) -> &'static str;

    /// Renders the file contents.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation fails.
    fn render(&self, document: &Document<'_>) -> Result<String>;
}

#[must_use]
/// Formats written for every build, in write order.
pub fn all_formats() -> Vec<Box<dyn Format>> {
    vec![Box::new(index::IndexFormat), Box::new(map::MapFormat)]
}
