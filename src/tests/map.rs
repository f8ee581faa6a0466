use super::{checksum, MapFormat};
use crate::formats::parts::Part;
use crate::formats::{Document, Format};
use crate::section::Section;
use serde_json::Value;

#[test]
fn test_checksum_is_sha256_hex() {
    assert_eq!(
        checksum("abc"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert_eq!(checksum("").len(), 64);
}

#[test]
fn test_map_entries() {
    let mut guide = Section::new("Guide", 1, 1, 3, "doc.md");
    guide.id = Some("MD1".to_string());
    guide.path = "Guide".to_string();
    guide.word_count = 7;
    guide.part_file = Some("parts/Guide.md".to_string());

    let mut unnamed = Section::new("Notes", 2, 4, 5, "doc.md");
    unnamed.path = "Guide > Notes".to_string();
    unnamed.part_file = Some("parts/Guide_Notes.md".to_string());

    let skipped = Section::new("Skipped", 2, 6, 6, "doc.md");

    let parts = vec![Part {
        relative_path: "parts/Guide.md".to_string(),
        content: "abc".to_string(),
    }];
    let sections = vec![guide, unnamed, skipped];
    let document = Document {
        input_file: "doc.md",
        sections: &sections,
        warnings: &[],
        parts: &parts,
    };

    let json = MapFormat.render(&document).unwrap();
    assert!(json.ends_with("]\n"));
    let entries: Value = serde_json::from_str(&json).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0]["id"], "MD1");
    assert_eq!(entries[0]["section"], "Guide");
    assert_eq!(entries[0]["original_start_line"], 1);
    assert_eq!(entries[0]["original_end_line"], 3);
    assert_eq!(entries[0]["word_count"], 7);
    assert_eq!(entries[0]["checksum"], checksum("abc"));

    assert!(entries[1].get("id").is_none());
    assert_eq!(entries[1]["path"], "Guide > Notes");
    assert_eq!(entries[1]["checksum"], "");
}

#[test]
fn test_map_keeps_non_ascii() {
    let mut section = Section::new("見出し", 1, 1, 1, "doc.md");
    section.part_file = Some("parts/見出し.md".to_string());
    let sections = vec![section];
    let document = Document {
        input_file: "doc.md",
        sections: &sections,
        warnings: &[],
        parts: &[],
    };
    let json = MapFormat.render(&document).unwrap();
    assert!(json.contains("\"section\": \"見出し\""));
}
