//! Sentence-level BLEU

use std::collections::HashMap;

use crate::scorer::{bounded, Scorer};
use crate::text::{Language, TextAnalyzer};

const MAX_ORDER: usize = 4;

/// Smoothed sentence BLEU over stemmed tokens.
///
/// Clipped n-gram precisions for n = 1..=4 are combined with uniform weights.
/// Orders above 1 use add-one smoothing so that short answers without 4-gram
/// overlap still get partial credit. Orders longer than the candidate are
/// dropped from the mean.
#[derive(Debug)]
pub struct BleuScorer {
    analyzer: TextAnalyzer,
}

impl BleuScorer {
    pub const NAME: &'static str = "bleu_score";

    pub fn new(language: Language) -> Self {
        Self {
            analyzer: TextAnalyzer::new(language),
        }
    }
}

impl Default for BleuScorer {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

impl Scorer for BleuScorer {
    fn calculate_score(&self, reference: &str, candidate: &str) -> f64 {
        let reference = self.analyzer.tokenize_and_stem(reference);
        let candidate = self.analyzer.tokenize_and_stem(candidate);

        if reference.is_empty() || candidate.is_empty() {
            return 0.0;
        }

        let max_order = MAX_ORDER.min(candidate.len());
        let mut log_precision_sum = 0.0;

        for n in 1..=max_order {
            let (clipped, total) = clipped_matches(&reference, &candidate, n);
            if n == 1 && clipped == 0 {
                return 0.0;
            }
            let precision = if n == 1 {
                clipped as f64 / total as f64
            } else {
                (clipped as f64 + 1.0) / (total as f64 + 1.0)
            };
            log_precision_sum += precision.ln();
        }

        let geometric_mean = (log_precision_sum / max_order as f64).exp();
        let brevity_penalty = if candidate.len() < reference.len() {
            (1.0 - reference.len() as f64 / candidate.len() as f64).exp()
        } else {
            1.0
        };

        bounded(brevity_penalty * geometric_mean)
    }

    fn score_name(&self) -> &str {
        Self::NAME
    }

    fn kind(&self) -> &'static str {
        "BleuScorer"
    }
}

fn ngram_counts(tokens: &[String], n: usize) -> HashMap<&[String], usize> {
    let mut counts = HashMap::new();
    for gram in tokens.windows(n) {
        *counts.entry(gram).or_insert(0) += 1;
    }
    counts
}

/// (candidate n-grams also in the reference, clipped by reference counts;
/// total candidate n-grams)
fn clipped_matches(reference: &[String], candidate: &[String], n: usize) -> (usize, usize) {
    let reference_counts = ngram_counts(reference, n);
    let candidate_counts = ngram_counts(candidate, n);

    let clipped = candidate_counts
        .iter()
        .map(|(gram, count)| (*count).min(reference_counts.get(gram).copied().unwrap_or(0)))
        .sum();
    let total = candidate.len().saturating_sub(n - 1);

    (clipped, total)
}
