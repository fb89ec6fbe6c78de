//! ROUGE-L F-measure

use crate::scorer::{bounded, f_measure, Scorer};
use crate::text::{Language, TextAnalyzer};

/// Longest-common-subsequence F-measure over stemmed tokens
#[derive(Debug)]
pub struct RougeLScorer {
    analyzer: TextAnalyzer,
}

impl RougeLScorer {
    pub const NAME: &'static str = "rouge_l_score";

    pub fn new(language: Language) -> Self {
        Self {
            analyzer: TextAnalyzer::new(language),
        }
    }
}

impl Default for RougeLScorer {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

impl Scorer for RougeLScorer {
    fn calculate_score(&self, reference: &str, candidate: &str) -> f64 {
        let reference = self.analyzer.tokenize_and_stem(reference);
        let candidate = self.analyzer.tokenize_and_stem(candidate);

        if reference.is_empty() || candidate.is_empty() {
            return 0.0;
        }

        let lcs = lcs_length(&reference, &candidate) as f64;
        let precision = lcs / candidate.len() as f64;
        let recall = lcs / reference.len() as f64;

        bounded(f_measure(precision, recall))
    }

    fn score_name(&self) -> &str {
        Self::NAME
    }

    fn kind(&self) -> &'static str {
        "RougeLScorer"
    }
}

/// Length of the longest common subsequence, O(n*m) time, O(m) space
pub(crate) fn lcs_length<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for x in a {
        for (j, y) in b.iter().enumerate() {
            curr[j + 1] = if x == y {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lcs_length() {
        assert_eq!(lcs_length(&["a", "b", "c", "d"], &["a", "c", "d"]), 3);
        assert_eq!(lcs_length(&["a", "b", "c"], &["c", "b", "a"]), 1);
        assert_eq!(lcs_length::<&str>(&[], &["a"]), 0);
    }

    #[test]
    fn test_identical() {
        let scorer = RougeLScorer::default();
        assert_eq!(scorer.calculate_score("El gato come pescado", "El gato come pescado"), 1.0);
    }

    #[test]
    fn test_empty_side_scores_zero() {
        let scorer = RougeLScorer::default();
        assert_eq!(scorer.calculate_score("El gato come pescado", ""), 0.0);
        assert_eq!(scorer.calculate_score("", "El gato"), 0.0);
    }

    #[test]
    fn test_partial_order() {
        // lcs = "el gat com" (3 of 4 on both sides)
        let scorer = RougeLScorer::default();
        let score = scorer.calculate_score("El gato come pescado", "El gato come carne");
        assert!((score - 0.75).abs() < 1e-9);
    }
}
