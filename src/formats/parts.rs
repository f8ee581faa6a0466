//! Part files: one Markdown fragment per section with a provenance header.

use crate::section::Section;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Directory holding part files, relative to the output directory.
pub const PARTS_DIR: &str = "parts";

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[/\\:*?"<>|]"#).expect("valid filename regex"));
static UNDERSCORE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("_+").expect("valid underscore regex"));

#[derive(Clone, Debug, PartialEq, Eq)]
/// A rendered part file.
pub struct Part {
    /// Path relative to the output directory, e.g. `parts/Guide_Install.md`.
    pub relative_path: String,
    /// Header followed by the section's lines.
    pub content: String,
}

/// Makes a title usable as a file name component.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let name = name.replace(' ', "_");
    let name = UNSAFE_CHARS.replace_all(&name, "");
    let name = UNDERSCORE_RUNS.replace_all(&name, "_");
    name.trim_matches('_').to_string()
}

/// File name for `sections[index]` built from its ancestor chain.
///
/// Names already in `existing` get a `_1`, `_2`, ... suffix.
#[must_use]
pub fn build_filename(sections: &[Section], index: usize, existing: &HashSet<String>) -> String {
    let mut chain = Vec::new();
    let mut current = Some(index);
    while let Some(i) = current {
        chain.push(sanitize_filename(sections[i].display_name()));
        current = sections[i].parent_index;
    }
    chain.reverse();

    let stem = chain.join("_");
    let name = format!("{stem}.md");
    if !existing.contains(&name) {
        return name;
    }
    (1..)
        .map(|counter| format!("{stem}_{counter}.md"))
        .find(|candidate| !existing.contains(candidate))
        .unwrap_or(name)
}

/// HTML comment describing where a part came from.
#[must_use]
pub fn part_header(section: &Section) -> String {
    let mut header = String::from("<!--\nmd2map fragment\n");
    if let Some(id) = &section.id {
        header.push_str(&format!("id: {id}\n"));
    }
    header.push_str(&format!(
        "original: {}\nlines: {}-{}\nsection: {}\nlevel: {}\n",
        section.original_file, section.start_line, section.end_line, section.title, section.level
    ));
    if section.is_subsplit {
        header.push_str("is_subsplit: true\n");
        if let Some(note) = &section.note {
            header.push_str(&format!("note: {note}\n"));
        }
        if let Some(title) = &section.subsplit_title {
            header.push_str(&format!("subsplit_title: {title}\n"));
        }
    }
    header.push_str("-->\n\n");
    header
}

/// Header plus the section's lines, each terminated by a newline.
#[must_use]
pub fn part_content<S: AsRef<str>>(section: &Section, lines: &[S]) -> String {
    let end = section.end_line.min(lines.len());
    let start = section.start_line.max(1);
    let mut content = part_header(section);
    if start <= end {
        for line in &lines[start - 1..end] {
            content.push_str(line.as_ref());
            content.push('\n');
        }
    }
    content
}

/// Names every section's part file, records it on the section, and renders
/// the parts in section order.
pub fn plan_parts<S: AsRef<str>>(sections: &mut [Section], lines: &[S]) -> Vec<Part> {
    let mut existing = HashSet::new();
    let mut parts = Vec::with_capacity(sections.len());

    for index in 0..sections.len() {
        let file_name = build_filename(sections, index, &existing);
        let relative_path = format!("{PARTS_DIR}/{file_name}");
        existing.insert(file_name);

        let section = &mut sections[index];
        section.part_file = Some(relative_path.clone());
        parts.push(Part {
            relative_path,
            content: part_content(section, lines),
        });
    }
    parts
}

#[cfg(test)]
#[path = "../tests/parts.rs"]
mod tests;
