use super::{
    count_words, extract_keywords, extract_links, extract_section_info, extract_summary, has_cjk,
    join_range,
};
use crate::section::{Link, Section};

#[test]
fn test_ascii_counts_tokens() {
    assert_eq!(count_words("Hello World"), 2);
    assert_eq!(count_words("  spaced   out\n\nwords  "), 3);
}

#[test]
fn test_japanese_counts_characters() {
    assert_eq!(count_words("こんにちは"), 5);
    assert_eq!(count_words("日本 語"), 3);
}

#[test]
fn test_heading_marker_and_fences_ignored() {
    assert_eq!(count_words("## Two Words\n```rust\nlet x = 1;\n```"), 6);
    assert_eq!(count_words("# 見出し\n本文"), 5);
}

#[test]
fn test_has_cjk() {
    assert!(has_cjk("abc カタカナ"));
    assert!(!has_cjk("plain ascii é"));
}

#[test]
fn test_summary_first_paragraph() {
    let lines = ["", "First line", "second **bold** line", "", "Next paragraph"];
    assert_eq!(
        extract_summary(&lines).as_deref(),
        Some("First line second bold line")
    );
}

#[test]
fn test_summary_stops_at_heading_and_fence() {
    assert_eq!(extract_summary(&["## Sub", "text"]), None);
    assert_eq!(extract_summary(&["```", "code"]), None);
    assert_eq!(
        extract_summary(&["intro", "```", "code"]).as_deref(),
        Some("intro")
    );
}

#[test]
fn test_summary_is_clipped() {
    let long = "x".repeat(150);
    let summary = extract_summary(&[long.as_str()]).unwrap();
    assert_eq!(summary.chars().count(), 100);
    assert!(summary.ends_with("..."));

    let japanese = "あ".repeat(120);
    let summary = extract_summary(&[japanese.as_str()]).unwrap();
    assert_eq!(summary.chars().count(), 100);
}

#[test]
fn test_keywords_are_deduplicated() {
    let keywords = extract_keywords("**alpha** and **beta** then **alpha** again");
    assert_eq!(keywords.len(), 2);
    assert!(keywords.contains("alpha"));
    assert!(keywords.contains("beta"));
}

#[test]
fn test_links_in_order() {
    let links = extract_links("See [docs](https://a.example) and [guide](./guide.md).");
    assert_eq!(
        links,
        vec![
            Link {
                text: "docs".into(),
                url: "https://a.example".into()
            },
            Link {
                text: "guide".into(),
                url: "./guide.md".into()
            },
        ]
    );
}

#[test]
fn test_join_range_clamps() {
    let lines = ["a", "b", "c"];
    assert_eq!(join_range(&lines, 2, 3), "b\nc");
    assert_eq!(join_range(&lines, 2, 10), "b\nc");
    assert_eq!(join_range(&lines, 4, 5), "");
}

#[test]
fn test_section_info() {
    let lines = [
        "# Setup",
        "",
        "Install **cargo** first.",
        "See [book](https://doc.rust-lang.org/book).",
        "",
        "More text here.",
    ];
    let mut section = Section::new("Setup", 1, 1, 6, "doc.md");
    extract_section_info(&mut section, &lines);

    assert_eq!(
        section.summary.as_deref(),
        Some("Install cargo first. See [book](https://doc.rust-lang.org/book).")
    );
    assert!(section.keywords.contains("cargo"));
    assert_eq!(section.links.len(), 1);
    assert_eq!(section.word_count, 9);
}
