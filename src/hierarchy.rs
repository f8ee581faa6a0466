//! Tree construction over the flat section arena.
//!
//! Sections stay in a `start_line` ordered `Vec`; the tree is expressed by
//! `parent_index`/`children_indices` and a materialised `path`. The pass is a
//! single explicit-stack loop, so deeply nested documents cost no call depth.

use crate::headings::Heading;
use crate::section::Section;

/// Separator between ancestor titles in a section path.
pub const PATH_SEPARATOR: &str = " > ";

/// Turns ordered headings into sections spanning up to the next heading.
///
/// The last section runs to `line_count`. Hierarchy links are filled in
/// before returning.
#[must_use]
pub fn build_sections(headings: &[Heading], line_count: usize, original_file: &str) -> Vec<Section> {
    let mut sections: Vec<Section> = headings
        .iter()
        .enumerate()
        .map(|(i, heading)| {
            let end_line = headings
                .get(i + 1)
                .map_or(line_count, |next| next.line - 1)
                .max(heading.line);
            Section::new(
                heading.title.clone(),
                heading.level,
                heading.line,
                end_line,
                original_file,
            )
        })
        .collect();

    build_hierarchy(&mut sections);
    sections
}

/// Recomputes parent links, child lists and paths for the whole arena.
///
/// Each section's parent is the nearest open section with a strictly smaller
/// level. Virtual sections attach to the section they follow and are never
/// opened themselves, so they always stay leaves.
pub fn build_hierarchy(sections: &mut [Section]) {
    for section in sections.iter_mut() {
        section.parent_index = None;
        section.children_indices.clear();
    }

    let mut stack: Vec<usize> = Vec::new();

    for index in 0..sections.len() {
        let level = sections[index].level;

        if !sections[index].is_subsplit {
            while let Some(&top) = stack.last() {
                if sections[top].level >= level {
                    stack.pop();
                } else {
                    break;
                }
            }
        }

        let parent = stack.last().copied();
        let path = match parent {
            Some(parent) => format!(
                "{}{PATH_SEPARATOR}{}",
                sections[parent].path,
                sections[index].display_name()
            ),
            None => sections[index].display_name().to_string(),
        };

        if let Some(parent) = parent {
            sections[parent].children_indices.push(index);
        }
        let section = &mut sections[index];
        section.parent_index = parent;
        section.path = path;

        if !section.is_subsplit {
            stack.push(index);
        }
    }
}

#[cfg(test)]
#[path = "tests/hierarchy.rs"]
mod tests;
