//! Error types for scorer construction
//!
//! Scoring itself never fails; these errors only come from building the
//! scorer set, and callers treat them as fatal configuration problems.

/// Configuration errors raised while assembling scorers
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Unknown scorer: {0}")]
    UnknownScorer(String),

    #[error("Duplicate scorer name: {0}")]
    DuplicateScorer(String),

    #[error("No scorers configured")]
    EmptyScorerSet,

    #[error("Lexicon error: {0}")]
    Lexicon(String),
}

pub type Result<T> = std::result::Result<T, Error>;
