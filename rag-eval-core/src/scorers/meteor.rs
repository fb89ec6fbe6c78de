//! METEOR-style alignment score
//!
//! Unigrams are aligned in two stages: identical stems, then (when a lexicon
//! is attached) stems that belong to the same synonym group. The harmonic
//! F-mean of unigram precision and recall, weighted towards recall, is then
//! discounted by a fragmentation penalty that grows with the number of
//! discontiguous chunks in the alignment.
//!
//! Without a same-language lexicon the synonym stage is skipped and the score
//! reduces to stem matches plus word order. It is not a full reproduction of
//! METEOR, which also relies on paraphrase tables.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::scorer::{bounded, Scorer};
use crate::text::{Language, TextAnalyzer};

const ALPHA: f64 = 0.9;
const BETA: f64 = 3.0;
const GAMMA: f64 = 0.5;

/// Groups of interchangeable words for one language.
///
/// Serialized as a JSON array of arrays: `[["coche", "auto", "carro"], ...]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lexicon {
    groups: Vec<Vec<String>>,
}

impl Lexicon {
    pub fn new(groups: Vec<Vec<String>>) -> Self {
        Self { groups }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::Lexicon(e.to_string()))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Lexicon(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn groups(&self) -> &[Vec<String>] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Alignment-based score with a fragmentation penalty
#[derive(Debug)]
pub struct MeteorScorer {
    analyzer: TextAnalyzer,
    /// stem -> ids of the synonym groups containing it
    synonyms: HashMap<String, HashSet<usize>>,
}

impl MeteorScorer {
    pub const NAME: &'static str = "meteor_score";

    pub fn new(language: Language) -> Self {
        Self {
            analyzer: TextAnalyzer::new(language),
            synonyms: HashMap::new(),
        }
    }

    /// Enable the synonym stage. Entries are stemmed with this scorer's
    /// analyzer; multi-word entries are ignored.
    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        for (group_id, group) in lexicon.groups.iter().enumerate() {
            for entry in group {
                let stems = self.analyzer.tokenize_and_stem(entry);
                if let [stem] = stems.as_slice() {
                    self.synonyms
                        .entry(stem.clone())
                        .or_default()
                        .insert(group_id);
                }
            }
        }
        self
    }

    pub fn has_lexicon(&self) -> bool {
        !self.synonyms.is_empty()
    }

    fn are_synonyms(&self, a: &str, b: &str) -> bool {
        match (self.synonyms.get(a), self.synonyms.get(b)) {
            (Some(x), Some(y)) => !x.is_disjoint(y),
            _ => false,
        }
    }

    /// Word alignment as (hypothesis index, reference index), ordered by
    /// hypothesis index
    fn align(&self, hypothesis: &[String], reference: &[String]) -> Vec<(usize, usize)> {
        let mut aligner = Aligner::new(hypothesis.len(), reference.len());
        aligner.stage(hypothesis, reference, |h, r| h == r);
        if self.has_lexicon() {
            aligner.stage(hypothesis, reference, |h, r| self.are_synonyms(h, r));
        }

        let mut matches = aligner.matches;
        matches.sort_unstable();
        matches
    }
}

impl Default for MeteorScorer {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

impl Scorer for MeteorScorer {
    fn calculate_score(&self, reference: &str, candidate: &str) -> f64 {
        let reference = self.analyzer.tokenize_and_stem(reference);
        let hypothesis = self.analyzer.tokenize_and_stem(candidate);

        if reference.is_empty() || hypothesis.is_empty() {
            return 0.0;
        }

        let matches = self.align(&hypothesis, &reference);
        if matches.is_empty() {
            return 0.0;
        }

        let matched = matches.len() as f64;
        let precision = matched / hypothesis.len() as f64;
        let recall = matched / reference.len() as f64;
        let fmean = precision * recall / (ALPHA * precision + (1.0 - ALPHA) * recall);

        let fragmentation = count_chunks(&matches) as f64 / matched;
        let penalty = GAMMA * fragmentation.powf(BETA);

        bounded(fmean * (1.0 - penalty))
    }

    fn score_name(&self) -> &str {
        Self::NAME
    }

    fn kind(&self) -> &'static str {
        "MeteorScorer"
    }
}

/// Greedy one-to-one alignment state shared across matching stages
struct Aligner {
    hypothesis_used: Vec<bool>,
    reference_used: Vec<bool>,
    matches: Vec<(usize, usize)>,
}

impl Aligner {
    fn new(hypothesis_len: usize, reference_len: usize) -> Self {
        Self {
            hypothesis_used: vec![false; hypothesis_len],
            reference_used: vec![false; reference_len],
            matches: Vec::new(),
        }
    }

    /// Visit hypothesis words last to first, pairing each with the last
    /// unaligned reference word accepted by `is_match`
    fn stage<F>(&mut self, hypothesis: &[String], reference: &[String], is_match: F)
    where
        F: Fn(&str, &str) -> bool,
    {
        for i in (0..hypothesis.len()).rev() {
            if self.hypothesis_used[i] {
                continue;
            }
            for j in (0..reference.len()).rev() {
                if !self.reference_used[j] && is_match(&hypothesis[i], &reference[j]) {
                    self.hypothesis_used[i] = true;
                    self.reference_used[j] = true;
                    self.matches.push((i, j));
                    break;
                }
            }
        }
    }
}

/// Number of runs of matches that are adjacent in both sequences
fn count_chunks(matches: &[(usize, usize)]) -> usize {
    if matches.is_empty() {
        return 0;
    }

    1 + matches
        .windows(2)
        .filter(|w| !(w[1].0 == w[0].0 + 1 && w[1].1 == w[0].1 + 1))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_chunks() {
        assert_eq!(count_chunks(&[]), 0);
        assert_eq!(count_chunks(&[(0, 0), (1, 1), (2, 2)]), 1);
        assert_eq!(count_chunks(&[(0, 2), (1, 0), (2, 1)]), 2);
        assert_eq!(count_chunks(&[(0, 2), (1, 1), (2, 0)]), 3);
    }

    #[test]
    fn test_identical_four_words() {
        // one chunk over four matches: penalty 0.5 * 0.25^3
        let scorer = MeteorScorer::default();
        let score = scorer.calculate_score("El gato come pescado", "El gato come pescado");
        let expected = 1.0 - 0.5 * 0.25f64.powi(3);
        assert!((score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_word_order_penalized() {
        let scorer = MeteorScorer::default();
        let ordered = scorer.calculate_score("el gato come pescado", "el gato come pescado");
        let shuffled = scorer.calculate_score("el gato come pescado", "pescado come gato el");
        assert!(shuffled < ordered);
        assert!(shuffled > 0.0);
    }

    #[test]
    fn test_empty_or_unmatched() {
        let scorer = MeteorScorer::default();
        assert_eq!(scorer.calculate_score("", "gato"), 0.0);
        assert_eq!(scorer.calculate_score("gato", ""), 0.0);
        assert_eq!(scorer.calculate_score("gato", "perro"), 0.0);
    }

    #[test]
    fn test_lexicon_enables_synonym_matches() {
        let lexicon = Lexicon::from_json(r#"[["coche", "auto", "carro"]]"#).unwrap();
        let plain = MeteorScorer::new(Language::Spanish);
        let with_synonyms = MeteorScorer::new(Language::Spanish).with_lexicon(lexicon);

        assert!(with_synonyms.has_lexicon());
        let without = plain.calculate_score("un coche rojo", "un auto rojo");
        let with = with_synonyms.calculate_score("un coche rojo", "un auto rojo");
        assert!(with > without);
    }

    #[test]
    fn test_lexicon_rejects_bad_json() {
        assert!(matches!(Lexicon::from_json("{\"not\": \"groups\"}"), Err(Error::Lexicon(_))));
    }
}
