//! Morphological tokenizer interface used by paragraph-similarity refinement.
//!
//! Only noun surfaces matter to the refiner. The built-in [`LexicalTokenizer`]
//! needs no dictionary: it tags content words in alphabetic scripts and
//! kanji/katakana runs in Japanese as nouns. A dictionary-backed analyser can
//! be plugged in through [`MorphTokenizer`].

use crate::metadata::is_cjk_char;
use std::collections::BTreeSet;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Error)]
/// Failure reported by a tokenizer implementation.
pub enum TokenizeError {
    /// The analyser could not be used (missing dictionary, bad state...).
    #[error("tokenizer unavailable: {0}")]
    Unavailable(String),
    /// The analyser rejected the input.
    #[error("tokenization failed: {0}")]
    Failed(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Coarse part-of-speech tag.
pub enum PartOfSpeech {
    /// Nouns and noun-like content words.
    Noun,
    /// Function words and inflectional material.
    Particle,
    /// Anything else.
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// One token produced by a tokenizer.
pub struct Token {
    /// Token text as it should be compared.
    pub surface: String,
    /// Tag assigned by the tokenizer.
    pub part_of_speech: PartOfSpeech,
}

/// Splits text into tagged tokens.
pub trait MorphTokenizer {
    /// Tokenizes `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if the analyser is unavailable or rejects the text.
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizeError>;

    /// Distinct noun surfaces of `text`.
    ///
    /// # Errors
    ///
    /// Propagates [`MorphTokenizer::tokenize`] failures.
    fn nouns(&self, text: &str) -> Result<BTreeSet<String>, TokenizeError> {
        Ok(self
            .tokenize(text)?
            .into_iter()
            .filter(|token| token.part_of_speech == PartOfSpeech::Noun)
            .map(|token| token.surface)
            .collect())
    }
}

const STOP_WORDS: &[&str] = &[
    "about", "after", "again", "all", "also", "and", "any", "are", "because", "been", "before",
    "being", "both", "but", "can", "could", "did", "does", "each", "for", "from", "had", "has",
    "have", "her", "here", "him", "his", "how", "into", "its", "just", "more", "most", "not",
    "now", "only", "other", "our", "out", "over", "same", "she", "should", "some", "such",
    "than", "that", "the", "their", "them", "then", "there", "these", "they", "this", "those",
    "through", "too", "under", "very", "was", "were", "what", "when", "where", "which", "while",
    "who", "why", "will", "with", "would", "you", "your",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Script {
    Kanji,
    Katakana,
    Hiragana,
    Other,
}

fn script_of(c: char) -> Script {
    match c {
        '\u{3040}'..='\u{309F}' => Script::Hiragana,
        '\u{30A0}'..='\u{30FF}' => Script::Katakana,
        c if is_cjk_char(c) => Script::Kanji,
        _ => Script::Other,
    }
}

#[derive(Clone, Copy, Debug)]
/// Dictionary-free tokenizer over Unicode word boundaries.
pub struct LexicalTokenizer {
    min_word_chars: usize,
}

impl Default for LexicalTokenizer {
    fn default() -> Self {
        Self { min_word_chars: 3 }
    }
}

impl LexicalTokenizer {
    #[must_use]
    /// Creates a tokenizer treating words shorter than `min_word_chars` as function words.
    pub fn new(min_word_chars: usize) -> Self {
        Self { min_word_chars }
    }

    fn classify_word(&self, word: &str) -> Token {
        let surface = word.to_lowercase();
        let is_noun = surface.chars().count() >= self.min_word_chars
            && !surface.chars().all(|c| c.is_numeric())
            && !STOP_WORDS.contains(&surface.as_str());
        Token {
            surface,
            part_of_speech: if is_noun {
                PartOfSpeech::Noun
            } else {
                PartOfSpeech::Other
            },
        }
    }

    fn flush_run(&self, script: Script, run: &str, tokens: &mut Vec<Token>) {
        if run.is_empty() {
            return;
        }
        match script {
            Script::Kanji | Script::Katakana => tokens.push(Token {
                surface: run.to_string(),
                part_of_speech: PartOfSpeech::Noun,
            }),
            Script::Hiragana => tokens.push(Token {
                surface: run.to_string(),
                part_of_speech: PartOfSpeech::Particle,
            }),
            Script::Other => tokens.extend(run.unicode_words().map(|w| self.classify_word(w))),
        }
    }
}

impl MorphTokenizer for LexicalTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizeError> {
        let mut tokens = Vec::new();
        let mut run_start = 0;
        let mut run_script = Script::Other;

        for (offset, c) in text.char_indices() {
            let script = script_of(c);
            if script != run_script {
                self.flush_run(run_script, &text[run_start..offset], &mut tokens);
                run_start = offset;
                run_script = script;
            }
        }
        self.flush_run(run_script, &text[run_start..], &mut tokens);

        Ok(tokens)
    }
}

#[cfg(test)]
#[path = "tests/tokenizer.rs"]
mod tests;
