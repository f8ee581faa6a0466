use super::Config;
use crate::error::Md2mapError;
use crate::llm::{ProviderKind, DEFAULT_MAX_TOKENS};
use crate::parser::ParseOptions;
use crate::refine::SplitMode;
use std::fs;
use std::path::Path;

#[test]
fn test_empty_toml_gives_defaults() {
    let config = Config::from_toml("", Path::new("md2map.toml")).unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.split_mode().unwrap(), SplitMode::Heading);
    assert_eq!(config.ai_provider().unwrap(), ProviderKind::Bedrock);
    assert_eq!(config.ai_model(), None);
    assert_eq!(config.ai_region(), None);
}

#[test]
fn test_defaults_match_parse_and_provider_defaults() {
    let config = Config::default();
    assert_eq!(config.parse_options(), ParseOptions::default());
    assert_eq!(config.id_prefix, "MD");
    assert_eq!(config.ai_max_tokens, DEFAULT_MAX_TOKENS);
    assert_eq!(config.ai_timeout_secs, 120);
}

#[test]
fn test_partial_toml_overrides_fields() {
    let toml = "split_mode = \"nlp\"\nsplit_threshold = 120\nid_prefix = \"DOC\"\n";
    let config = Config::from_toml(toml, Path::new("md2map.toml")).unwrap();
    assert_eq!(config.split_mode().unwrap(), SplitMode::Nlp);
    assert_eq!(config.split_threshold, 120);
    assert_eq!(config.id_prefix, "DOC");
    assert_eq!(config.max_subsections, 5);
}

#[test]
fn test_invalid_values_are_reported() {
    let config = Config {
        split_mode: "semantic".to_string(),
        ai_provider: "vertex".to_string(),
        ..Config::default()
    };
    assert!(matches!(
        config.split_mode(),
        Err(Md2mapError::InvalidOption { option: "split_mode", .. })
    ));
    assert!(matches!(
        config.ai_provider(),
        Err(Md2mapError::InvalidOption { option: "ai_provider", .. })
    ));
}

#[test]
fn test_parse_options_are_clamped() {
    let config = Config {
        max_depth: 12,
        split_threshold: 0,
        ..Config::default()
    };
    let options = config.parse_options();
    assert_eq!(options.max_depth, 6);
    assert_eq!(options.split_threshold, 1);
}

#[test]
fn test_load_from_file_and_fallbacks() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("missing.toml");
    assert_eq!(Config::load_from(&missing), Config::default());

    let broken = dir.path().join("broken.toml");
    fs::write(&broken, "max_depth = \"deep\"").unwrap();
    assert_eq!(Config::load_from(&broken), Config::default());

    let good = dir.path().join("md2map.toml");
    fs::write(&good, "max_depth = 4\nai_model = \"gpt-4o\"\nai_region = \"us-east-1\"\n").unwrap();
    let config = Config::load_from(&good);
    assert_eq!(config.max_depth, 4);
    assert_eq!(config.ai_model(), Some("gpt-4o"));
    assert_eq!(config.ai_region(), Some("us-east-1"));
}
