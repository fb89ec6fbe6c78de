//! TF-IDF cosine similarity

use std::collections::{BTreeMap, HashMap};

use crate::scorer::{bounded, Scorer};
use crate::text::{Language, TextAnalyzer};

/// Cosine similarity between TF-IDF vectors of the two texts.
///
/// The IDF is fitted on the pair alone (a two-document corpus), so terms
/// shared by both texts get weight 1 and terms unique to one text get
/// `ln(3/2) + 1`. The score mostly reflects term-frequency overlap.
#[derive(Debug)]
pub struct CosineScorer {
    analyzer: TextAnalyzer,
}

impl CosineScorer {
    pub const NAME: &'static str = "cosine_similarity";

    pub fn new(language: Language) -> Self {
        Self {
            analyzer: TextAnalyzer::new(language),
        }
    }
}

impl Default for CosineScorer {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

impl Scorer for CosineScorer {
    fn calculate_score(&self, reference: &str, candidate: &str) -> f64 {
        let documents = [
            self.analyzer.tokenize_and_stem(reference),
            self.analyzer.tokenize_and_stem(candidate),
        ];

        let vectors = tfidf_vectors(&documents);
        let (Some(a), Some(b)) = (vectors.first(), vectors.get(1)) else {
            return 0.0;
        };

        bounded(cosine(a, b))
    }

    fn score_name(&self) -> &str {
        Self::NAME
    }

    fn kind(&self) -> &'static str {
        "CosineScorer"
    }
}

/// L2-normalised TF-IDF vectors with smoothed IDF, one per document
fn tfidf_vectors(documents: &[Vec<String>]) -> Vec<BTreeMap<&str, f64>> {
    let n = documents.len() as f64;

    let mut document_frequency: HashMap<&str, usize> = HashMap::new();
    for doc in documents {
        let mut seen: Vec<&str> = doc.iter().map(String::as_str).collect();
        seen.sort_unstable();
        seen.dedup();
        for term in seen {
            *document_frequency.entry(term).or_insert(0) += 1;
        }
    }

    documents
        .iter()
        .map(|doc| {
            let mut vector: BTreeMap<&str, f64> = BTreeMap::new();
            for term in doc {
                *vector.entry(term.as_str()).or_insert(0.0) += 1.0;
            }
            for (term, weight) in vector.iter_mut() {
                let df = document_frequency.get(term).copied().unwrap_or(0) as f64;
                *weight *= ((1.0 + n) / (1.0 + df)).ln() + 1.0;
            }
            let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
            if norm > 0.0 {
                for weight in vector.values_mut() {
                    *weight /= norm;
                }
            }
            vector
        })
        .collect()
}

/// Dot product of two normalised sparse vectors; 0.0 if either is empty
fn cosine(a: &BTreeMap<&str, f64>, b: &BTreeMap<&str, f64>) -> f64 {
    if a.is_empty() || b.is_empty() {
        tracing::debug!("degenerate TF-IDF vector, scoring cosine as 0.0");
        return 0.0;
    }

    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(term, w)| large.get(term).map(|v| w * v))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_texts() {
        let scorer = CosineScorer::default();
        let score = scorer.calculate_score("El gato come pescado", "El gato come pescado");
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_inputs() {
        let scorer = CosineScorer::default();
        assert_eq!(scorer.calculate_score("", ""), 0.0);
        assert_eq!(scorer.calculate_score("El gato", ""), 0.0);
        assert_eq!(scorer.calculate_score("", "El gato"), 0.0);
        assert_eq!(scorer.calculate_score("?!", "..."), 0.0);
    }

    #[test]
    fn test_disjoint_texts() {
        let scorer = CosineScorer::default();
        assert_eq!(scorer.calculate_score("gato negro", "perro blanco"), 0.0);
    }

    #[test]
    fn test_partial_overlap_uses_pair_idf() {
        // "gat" is shared (idf 1), "negr" and "grand" are unique (idf ln 1.5 + 1)
        let scorer = CosineScorer::default();
        let score = scorer.calculate_score("gato negro", "gato grande");
        let unique = 1.5f64.ln() + 1.0;
        let expected = 1.0 / (1.0 + unique * unique);
        assert!((score - expected).abs() < 1e-9, "score {score}, expected {expected}");
    }

    #[test]
    fn test_stemming_matches_inflections() {
        let scorer = CosineScorer::default();
        let score = scorer.calculate_score("los gatos comen", "el gato come");
        assert!(score > 0.4);
    }
}
