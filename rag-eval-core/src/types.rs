//! Rows flowing through an evaluation batch

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Column holding the question sent to the system under test
pub const QUERY_COLUMN: &str = "query";
/// Column holding the expected answer
pub const GROUND_TRUTH_COLUMN: &str = "ground_truth";
/// Column added for the collected answer
pub const ACTUAL_RESPONSE_COLUMN: &str = "actual_response";
/// Column added for the per-row mean of all metrics
pub const AVERAGE_SCORE_COLUMN: &str = "average_score";

/// A reference answer and a candidate answer to compare
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPair {
    pub reference: String,
    pub candidate: String,
}

impl TextPair {
    pub fn new(reference: impl Into<String>, candidate: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            candidate: candidate.into(),
        }
    }
}

/// One input record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRow {
    pub query: String,
    pub ground_truth: String,
    /// Every input column in its original order, `query` and
    /// `ground_truth` included
    pub columns: IndexMap<String, String>,
}

impl EvaluationRow {
    pub fn new(query: impl Into<String>, ground_truth: impl Into<String>) -> Self {
        let query = query.into();
        let ground_truth = ground_truth.into();
        let mut columns = IndexMap::new();
        columns.insert(QUERY_COLUMN.to_string(), query.clone());
        columns.insert(GROUND_TRUTH_COLUMN.to_string(), ground_truth.clone());
        Self {
            query,
            ground_truth,
            columns,
        }
    }

    /// Build from a full record; `None` if `query` or `ground_truth` is absent
    pub fn from_columns(columns: IndexMap<String, String>) -> Option<Self> {
        let query = columns.get(QUERY_COLUMN)?.clone();
        let ground_truth = columns.get(GROUND_TRUTH_COLUMN)?.clone();
        Some(Self {
            query,
            ground_truth,
            columns,
        })
    }

    /// Add a pass-through column
    pub fn with_column(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.columns.insert(name.into(), value.into());
        self
    }
}

/// An input record after scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRow {
    pub row: EvaluationRow,
    pub actual_response: Option<String>,
    /// Metric name to score, in scorer registration order; `None` when no
    /// response was collected
    pub scores: Option<IndexMap<String, f64>>,
    pub average_score: Option<f64>,
}

impl ScoredRow {
    /// A row whose response is missing: every score field stays empty
    pub fn missing(row: EvaluationRow) -> Self {
        Self {
            row,
            actual_response: None,
            scores: None,
            average_score: None,
        }
    }

    pub fn is_scored(&self) -> bool {
        self.scores.is_some()
    }

    pub fn score(&self, name: &str) -> Option<f64> {
        self.scores.as_ref()?.get(name).copied()
    }
}
