//! md2map: decompose long Markdown documents into an indexed tree of sections.
//!
//! The parse core ([`parser::MarkdownParser`]) turns a document into an
//! ordered arena of [`section::Section`]s: ATX headings become sections,
//! sections are linked into a tree, over-sized sections are optionally
//! refined into virtual sub-sections, and each section gets a summary,
//! keywords, links and a word count. The [`output`] module then writes one
//! part file per section plus an INDEX.md and a MAP.json.
#![allow(clippy::multiple_crate_versions)]

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod formats;
pub mod headings;
pub mod hierarchy;
pub mod llm;
pub mod metadata;
pub mod output;
pub mod parser;
pub mod refine;
pub mod section;
pub mod tokenizer;

pub use error::{Md2mapError, Result};
pub use parser::{MarkdownParser, ParseOptions, ParseOutcome, SourceDocument};
pub use refine::{Refiner, SplitMode};
pub use section::Section;
