//! Evaluation manager: runs every registered scorer over a batch of rows

use std::collections::{HashMap, HashSet};
use std::fmt;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::scorer::{Scorer, ScorerKind, ScorerMetadata};
use crate::scorers::Lexicon;
use crate::text::Language;
use crate::types::{EvaluationRow, ScoredRow, TextPair};

/// Owns the active scorer set and applies it uniformly.
///
/// Scorers run in registration order, which also fixes the output column
/// order. The manager holds no per-row state, so rows can be scored in any
/// order or from several threads.
pub struct EvaluationManager {
    scorers: Vec<Box<dyn Scorer>>,
}

impl EvaluationManager {
    /// Build from explicit scorers. Fails on an empty set or a repeated name.
    pub fn new(scorers: Vec<Box<dyn Scorer>>) -> Result<Self> {
        if scorers.is_empty() {
            return Err(Error::EmptyScorerSet);
        }

        let mut seen = HashSet::new();
        for scorer in &scorers {
            if !seen.insert(scorer.score_name()) {
                return Err(Error::DuplicateScorer(scorer.score_name().to_string()));
            }
        }

        Ok(Self { scorers })
    }

    pub fn from_kinds(kinds: &[ScorerKind], language: Language) -> Result<Self> {
        Self::from_kinds_with_lexicon(kinds, language, None)
    }

    pub fn from_kinds_with_lexicon(
        kinds: &[ScorerKind],
        language: Language,
        lexicon: Option<&Lexicon>,
    ) -> Result<Self> {
        if kinds.contains(&ScorerKind::Meteor) && lexicon.map_or(true, Lexicon::is_empty) {
            tracing::warn!(
                "{} runs without a {} synonym lexicon; it only reflects stem matches and word order",
                ScorerKind::Meteor,
                language
            );
        }

        let scorers = kinds
            .iter()
            .map(|kind| kind.build_with_lexicon(language, lexicon))
            .collect();
        Self::new(scorers)
    }

    /// The default five-metric set for a language
    pub fn with_defaults(language: Language) -> Result<Self> {
        Self::from_kinds(&ScorerKind::defaults(), language)
    }

    pub fn scorers(&self) -> &[Box<dyn Scorer>] {
        &self.scorers
    }

    /// Metric names in registration order
    pub fn score_names(&self) -> Vec<&str> {
        self.scorers.iter().map(|s| s.score_name()).collect()
    }

    pub fn metadata(&self) -> Vec<ScorerMetadata> {
        self.scorers.iter().map(|s| s.metadata()).collect()
    }

    /// Run every scorer on one pair
    pub fn score_pair(&self, reference: &str, candidate: &str) -> IndexMap<String, f64> {
        self.scorers
            .iter()
            .map(|scorer| {
                (
                    scorer.score_name().to_string(),
                    scorer.calculate_score(reference, candidate),
                )
            })
            .collect()
    }

    pub fn score_text_pair(&self, pair: &TextPair) -> IndexMap<String, f64> {
        self.score_pair(&pair.reference, &pair.candidate)
    }

    /// Score a single row. A `None` response leaves every score field empty
    /// without calling any scorer.
    pub fn evaluate_row(&self, row: &EvaluationRow, response: Option<&str>) -> ScoredRow {
        let Some(response) = response else {
            tracing::debug!("No response for query {:?}, leaving scores empty", row.query);
            return ScoredRow::missing(row.clone());
        };

        let scores = self.score_pair(&row.ground_truth, response);
        let average_score = mean(scores.values().copied());

        ScoredRow {
            row: row.clone(),
            actual_response: Some(response.to_string()),
            scores: Some(scores),
            average_score,
        }
    }

    /// Score every row against the response collected for its query.
    ///
    /// Produces exactly one output row per input row, in input order.
    pub fn process_batch(
        &self,
        rows: &[EvaluationRow],
        responses: &HashMap<String, String>,
    ) -> Vec<ScoredRow> {
        let scored: Vec<ScoredRow> = rows
            .iter()
            .map(|row| self.evaluate_row(row, responses.get(&row.query).map(String::as_str)))
            .collect();

        let missing = scored.iter().filter(|r| !r.is_scored()).count();
        tracing::info!(
            "Scored {} of {} rows with {} metrics ({} without response)",
            scored.len() - missing,
            scored.len(),
            self.scorers.len(),
            missing
        );

        scored
    }
}

impl fmt::Debug for EvaluationManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluationManager")
            .field("scorers", &self.score_names())
            .finish()
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
