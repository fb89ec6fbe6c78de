//! Token-set F1

use std::collections::HashSet;

use crate::scorer::{bounded, f_measure, Scorer};
use crate::text::tokenize;

/// F1 over the distinct (unstemmed) tokens of both texts
#[derive(Debug, Default)]
pub struct TokenF1Scorer;

impl TokenF1Scorer {
    pub const NAME: &'static str = "token_f1";

    pub fn new() -> Self {
        Self
    }
}

impl Scorer for TokenF1Scorer {
    fn calculate_score(&self, reference: &str, candidate: &str) -> f64 {
        let reference: HashSet<String> = tokenize(reference).into_iter().collect();
        let candidate: HashSet<String> = tokenize(candidate).into_iter().collect();

        if reference.is_empty() || candidate.is_empty() {
            return 0.0;
        }

        let common = reference.intersection(&candidate).count() as f64;
        let precision = common / candidate.len() as f64;
        let recall = common / reference.len() as f64;

        bounded(f_measure(precision, recall))
    }

    fn score_name(&self) -> &str {
        Self::NAME
    }

    fn kind(&self) -> &'static str {
        "TokenF1Scorer"
    }
}
