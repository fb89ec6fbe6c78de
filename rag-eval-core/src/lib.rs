//! rageval - multi-metric scoring of RAG answers
//!
//! Compares candidate answers produced by a question-answering system with
//! ground-truth answers using several interchangeable similarity metrics,
//! and aggregates them per row.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use rageval::{EvaluationManager, EvaluationRow, Language};
//!
//! let manager = EvaluationManager::with_defaults(Language::Spanish).unwrap();
//!
//! let rows = vec![EvaluationRow::new("¿Qué come el gato?", "El gato come pescado")];
//! let mut responses = HashMap::new();
//! responses.insert("¿Qué come el gato?".to_string(), "El gato come pescado".to_string());
//!
//! let scored = manager.process_batch(&rows, &responses);
//! assert_eq!(scored[0].score("exact_match"), Some(1.0));
//! ```

pub mod error;
pub mod manager;
pub mod scorer;
pub mod scorers;
pub mod text;
pub mod types;

pub use error::{Error, Result};
pub use manager::EvaluationManager;
pub use scorer::{Scorer, ScorerKind, ScorerMetadata};
pub use scorers::{
    BleuScorer, CosineScorer, ExactMatchScorer, Lexicon, MeteorScorer, RougeLScorer,
    TokenF1Scorer,
};
pub use text::{normalize_strict, tokenize, Language, TextAnalyzer};
pub use types::{
    EvaluationRow, ScoredRow, TextPair, ACTUAL_RESPONSE_COLUMN, AVERAGE_SCORE_COLUMN,
    GROUND_TRUTH_COLUMN, QUERY_COLUMN,
};

pub use indexmap::IndexMap;
