//! Text normalization, tokenization and stemming
//!
//! Every scorer goes through [`TextAnalyzer`] so that all metrics agree on
//! what a token is. Tokens come from Unicode word boundaries (UAX #29), never
//! from whitespace splitting, so punctuation glued to a word does not produce
//! a distinct token.

use std::fmt;
use std::str::FromStr;

use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::Error;

/// Stemming language of the evaluated corpus.
///
/// Deserializes through [`FromStr`], so configuration files accept the same
/// names and ISO codes as the command line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Language {
    #[default]
    Spanish,
    English,
    French,
    German,
    Italian,
    Portuguese,
    Dutch,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Spanish => "spanish",
            Language::English => "english",
            Language::French => "french",
            Language::German => "german",
            Language::Italian => "italian",
            Language::Portuguese => "portuguese",
            Language::Dutch => "dutch",
        }
    }

    pub fn all() -> Vec<Language> {
        vec![
            Language::Spanish,
            Language::English,
            Language::French,
            Language::German,
            Language::Italian,
            Language::Portuguese,
            Language::Dutch,
        ]
    }

    fn algorithm(&self) -> Algorithm {
        match self {
            Language::Spanish => Algorithm::Spanish,
            Language::English => Algorithm::English,
            Language::French => Algorithm::French,
            Language::German => Algorithm::German,
            Language::Italian => Algorithm::Italian,
            Language::Portuguese => Algorithm::Portuguese,
            Language::Dutch => Algorithm::Dutch,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Language {
    type Err = Error;

    /// Accepts English names and ISO 639-1 codes, case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spanish" | "es" | "español" | "espanol" => Ok(Language::Spanish),
            "english" | "en" => Ok(Language::English),
            "french" | "fr" => Ok(Language::French),
            "german" | "de" => Ok(Language::German),
            "italian" | "it" => Ok(Language::Italian),
            "portuguese" | "pt" => Ok(Language::Portuguese),
            "dutch" | "nl" => Ok(Language::Dutch),
            _ => Err(Error::UnsupportedLanguage(s.to_string())),
        }
    }
}

impl TryFrom<String> for Language {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Tokenizer plus a Snowball stemmer for one language.
///
/// Owned by each scorer that needs it. The stemmer holds no per-call state,
/// so a shared reference can be used from several threads at once.
pub struct TextAnalyzer {
    language: Language,
    stemmer: Stemmer,
}

impl TextAnalyzer {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            stemmer: Stemmer::create(language.algorithm()),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Lowercase and split on word boundaries
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        tokenize(text)
    }

    pub fn stem(&self, token: &str) -> String {
        self.stemmer.stem(token).into_owned()
    }

    pub fn tokenize_and_stem(&self, text: &str) -> Vec<String> {
        tokenize(text)
            .iter()
            .map(|token| self.stem(token))
            .collect()
    }
}

impl Default for TextAnalyzer {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

impl fmt::Debug for TextAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextAnalyzer")
            .field("language", &self.language)
            .finish()
    }
}

/// Lowercase and split on Unicode word boundaries, dropping punctuation
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .unicode_words()
        .map(str::to_string)
        .collect()
}

/// Canonical form for exact-match comparison.
///
/// Lowercases, strips diacritics (NFD minus combining marks), collapses
/// whitespace runs and trims.
pub fn normalize_strict(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
