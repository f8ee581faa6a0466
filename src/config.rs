//! Configuration to acknowledge project preferences as well as set defaults.
//!
//! We look for an md2map.toml in the working directory and, if it parses,
//! take build settings from it. Command-line flags override whatever is here.

use crate::error::{Md2mapError, Result};
use crate::llm::{ProviderKind, DEFAULT_MAX_TOKENS, DEFAULT_TIMEOUT};
use crate::parser::{
    ParseOptions, DEFAULT_ID_PREFIX, DEFAULT_MAX_DEPTH, DEFAULT_MAX_SUBSECTIONS,
    DEFAULT_SPLIT_THRESHOLD,
};
use crate::refine::SplitMode;
use facet::Facet;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// File name searched for in the working directory.
pub const CONFIG_FILE: &str = "md2map.toml";

#[derive(Facet, Clone, Debug, PartialEq)]
/// Build preferences loaded from md2map.toml or falling back to defaults.
pub struct Config {
    #[facet(default = DEFAULT_MAX_DEPTH)]
    /// Deepest heading level turned into a section.
    pub max_depth: usize,
    #[facet(default = SplitMode::default().as_str().to_string())]
    /// One of `heading`, `nlp` or `ai`.
    pub split_mode: String,
    #[facet(default = DEFAULT_SPLIT_THRESHOLD)]
    /// Own-content words (or CJK characters) from which a section is refined.
    pub split_threshold: usize,
    #[facet(default = DEFAULT_MAX_SUBSECTIONS)]
    /// Most virtual sections produced from one section.
    pub max_subsections: usize,
    #[facet(default = DEFAULT_ID_PREFIX.to_string())]
    /// Prefix of generated section ids.
    pub id_prefix: String,
    #[facet(default = ProviderKind::default().as_str().to_string())]
    /// Language model provider for `ai` mode.
    pub ai_provider: String,
    #[facet(default = String::new())]
    /// Model id; empty selects the provider default.
    pub ai_model: String,
    #[facet(default = String::new())]
    /// Bedrock region; empty falls back to `AWS_REGION`.
    pub ai_region: String,
    #[facet(default = DEFAULT_MAX_TOKENS)]
    /// Completion budget per request.
    pub ai_max_tokens: u32,
    #[facet(default = DEFAULT_TIMEOUT.as_secs())]
    /// Request timeout in seconds.
    pub ai_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            split_mode: SplitMode::default().as_str().to_string(),
            split_threshold: DEFAULT_SPLIT_THRESHOLD,
            max_subsections: DEFAULT_MAX_SUBSECTIONS,
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
            ai_provider: ProviderKind::default().as_str().to_string(),
            ai_model: String::new(),
            ai_region: String::new(),
            ai_max_tokens: DEFAULT_MAX_TOKENS,
            ai_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Config {
    #[must_use]
    /// Load configuration from md2map.toml if present.
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    #[must_use]
    /// Load configuration from `path`, using defaults if it is missing or invalid.
    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = fs::read_to_string(path) else {
            return Self::default();
        };
        match Self::from_toml(&contents, path) {
            Ok(config) => {
                debug!("Loaded configuration from {}", path.display());
                config
            }
            Err(err) => {
                warn!("Ignoring {err}");
                Self::default()
            }
        }
    }

    /// Parses TOML text; `path` is only used in the error.
    ///
    /// # Errors
    ///
    /// Returns [`Md2mapError::Config`] if the text is not a valid configuration.
    pub fn from_toml(contents: &str, path: &Path) -> Result<Self> {
        facet_toml::from_str::<Self>(contents).map_err(|err| Md2mapError::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// The configured split mode.
    ///
    /// # Errors
    ///
    /// Returns [`Md2mapError::InvalidOption`] for an unknown mode name.
    pub fn split_mode(&self) -> Result<SplitMode> {
        self.split_mode.parse()
    }

    /// The configured provider.
    ///
    /// # Errors
    ///
    /// Returns [`Md2mapError::InvalidOption`] for an unknown provider name.
    pub fn ai_provider(&self) -> Result<ProviderKind> {
        self.ai_provider
            .parse()
            .map_err(|_| Md2mapError::InvalidOption {
                option: "ai_provider",
                value: self.ai_provider.clone(),
                expected: "openai, anthropic, bedrock",
            })
    }

    #[must_use]
    /// Configured model id, if one was set.
    pub fn ai_model(&self) -> Option<&str> {
        Some(self.ai_model.trim()).filter(|model| !model.is_empty())
    }

    #[must_use]
    /// Configured Bedrock region, if one was set.
    pub fn ai_region(&self) -> Option<&str> {
        Some(self.ai_region.trim()).filter(|region| !region.is_empty())
    }

    #[must_use]
    /// Parse options with values clamped into range.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::new(self.max_depth, self.split_threshold, self.max_subsections)
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
