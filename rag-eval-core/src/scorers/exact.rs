//! Exact match after strict normalization

use crate::scorer::Scorer;
use crate::text::normalize_strict;

/// 1.0 when both texts are equal ignoring case, accents and whitespace runs
#[derive(Debug, Default)]
pub struct ExactMatchScorer;

impl ExactMatchScorer {
    pub const NAME: &'static str = "exact_match";

    pub fn new() -> Self {
        Self
    }
}

impl Scorer for ExactMatchScorer {
    fn calculate_score(&self, reference: &str, candidate: &str) -> f64 {
        if normalize_strict(reference) == normalize_strict(candidate) {
            1.0
        } else {
            0.0
        }
    }

    fn score_name(&self) -> &str {
        Self::NAME
    }

    fn kind(&self) -> &'static str {
        "ExactMatchScorer"
    }
}
