use super::{check_level_skips, extract_headings, fence_marker, parse_heading, Heading};
use crate::diagnostics::Diagnostics;

fn lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}

#[test]
fn test_parse_heading_levels() {
    assert_eq!(parse_heading("# Title"), Some((1, "Title".to_string())));
    assert_eq!(parse_heading("###### Deep  "), Some((6, "Deep".to_string())));
    assert_eq!(parse_heading("#\tTabbed"), Some((1, "Tabbed".to_string())));
    assert_eq!(parse_heading("####### Seven"), None);
    assert_eq!(parse_heading("#NoSpace"), None);
    assert_eq!(parse_heading("#   "), None);
    assert_eq!(parse_heading("  # Indented"), None);
}

#[test]
fn test_fence_marker() {
    assert_eq!(fence_marker("```rust"), Some('`'));
    assert_eq!(fence_marker("~~~~"), Some('~'));
    assert_eq!(fence_marker("``"), None);
    assert_eq!(fence_marker("  ```"), None);
}

#[test]
fn test_headings_in_order() {
    let doc = lines("# One\n\ntext\n\n## Two\n\n### Three\n");
    let headings = extract_headings(&doc, 6);
    assert_eq!(
        headings,
        vec![
            Heading { level: 1, title: "One".into(), line: 1 },
            Heading { level: 2, title: "Two".into(), line: 5 },
            Heading { level: 3, title: "Three".into(), line: 7 },
        ]
    );
}

#[test]
fn test_max_depth_filters_deeper_headings() {
    let doc = lines("# A\n## B\n### C\n#### D");
    let headings = extract_headings(&doc, 2);
    let titles: Vec<_> = headings.iter().map(|h| h.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "B"]);
}

#[test]
fn test_front_matter_is_skipped() {
    let doc = lines("---\ntitle: x\n# not a heading\n---\n# Real");
    let headings = extract_headings(&doc, 6);
    assert_eq!(headings.len(), 1);
    assert_eq!(headings[0].title, "Real");
    assert_eq!(headings[0].line, 5);
}

#[test]
fn test_front_matter_only_on_first_line() {
    let doc = lines("# Top\n---\n# Still heading\n---");
    let headings = extract_headings(&doc, 6);
    assert_eq!(headings.len(), 2);
}

#[test]
fn test_code_fence_hides_headings() {
    let doc = lines("# A\n```\n# comment\n```\n## B");
    let headings = extract_headings(&doc, 6);
    let titles: Vec<_> = headings.iter().map(|h| h.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "B"]);
}

#[test]
fn test_fence_closes_only_on_same_marker() {
    let doc = lines("# A\n~~~\n```\n# hidden\n```\n# still hidden\n~~~\n# B");
    let headings = extract_headings(&doc, 6);
    let titles: Vec<_> = headings.iter().map(|h| h.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "B"]);
}

#[test]
fn test_unclosed_fence_hides_rest() {
    let doc = lines("# A\n```\n# B\n# C");
    assert_eq!(extract_headings(&doc, 6).len(), 1);
}

#[test]
fn test_level_skip_warning_mentions_both_levels() {
    let doc = lines("# A\n\ntext\n\n### B\n");
    let headings = extract_headings(&doc, 6);
    let mut diagnostics = Diagnostics::new();
    check_level_skips(&headings, &mut diagnostics);

    assert_eq!(diagnostics.warnings().len(), 1);
    let warning = &diagnostics.warnings()[0];
    assert!(warning.contains("H1"), "{warning}");
    assert!(warning.contains("H3"), "{warning}");
    assert!(warning.contains("line 5"), "{warning}");
}

#[test]
fn test_no_warning_when_levels_step_down() {
    let doc = lines("# A\n## B\n### C\n# D\n## E");
    let headings = extract_headings(&doc, 6);
    let mut diagnostics = Diagnostics::new();
    check_level_skips(&headings, &mut diagnostics);
    assert!(diagnostics.is_empty());
}
