//! Evaluation datasets: queries paired with ground-truth answers

pub mod loader;

pub use loader::{load_dataset, load_dataset_from_reader, load_dataset_from_str, LoadError};

use std::collections::HashSet;

use rageval::EvaluationRow;

/// Rows of a CSV dataset plus its header, in file order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<EvaluationRow>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct queries in first-seen order
    pub fn queries(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .filter(|row| seen.insert(row.query.as_str()))
            .map(|row| row.query.clone())
            .collect()
    }

    /// Keep only the first `limit` rows
    pub fn truncate(&mut self, limit: usize) {
        self.rows.truncate(limit);
    }
}
