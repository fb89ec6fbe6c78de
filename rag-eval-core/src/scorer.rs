//! Scorer capability and the catalogue of built-in variants

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::scorers::{
    BleuScorer, CosineScorer, ExactMatchScorer, Lexicon, MeteorScorer, RougeLScorer,
    TokenF1Scorer,
};
use crate::text::Language;

/// A similarity measure between a reference answer and a candidate answer.
///
/// Implementations must be pure: the same pair always yields the same score,
/// the score lies in `[0.0, 1.0]`, and malformed or empty input produces
/// `0.0` rather than a panic.
pub trait Scorer: Send + Sync {
    /// Score `candidate` against `reference`
    fn calculate_score(&self, reference: &str, candidate: &str) -> f64;

    /// Stable metric name, also used as the output column
    fn score_name(&self) -> &str;

    /// Short name of the implementing type
    fn kind(&self) -> &'static str;

    fn metadata(&self) -> ScorerMetadata {
        ScorerMetadata {
            name: self.score_name().to_string(),
            kind: self.kind().to_string(),
        }
    }
}

/// Descriptive information about a scorer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorerMetadata {
    pub name: String,
    pub kind: String,
}

/// Clamp a raw score into the unit interval; NaN becomes 0.0
pub(crate) fn bounded(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

/// Harmonic mean of precision and recall, 0.0 when both are zero
pub(crate) fn f_measure(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// Built-in scorer variants, addressable by score name.
///
/// Serializes as the score name; deserializes through [`FromStr`], so
/// aliases such as `rouge` or `f1` work in configuration files too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum ScorerKind {
    #[serde(rename = "cosine_similarity")]
    Cosine,
    #[serde(rename = "rouge_l_score")]
    RougeL,
    #[serde(rename = "exact_match")]
    ExactMatch,
    #[serde(rename = "token_f1")]
    TokenF1,
    #[serde(rename = "meteor_score")]
    Meteor,
    #[serde(rename = "bleu_score")]
    Bleu,
}

impl ScorerKind {
    pub fn score_name(&self) -> &'static str {
        match self {
            ScorerKind::Cosine => CosineScorer::NAME,
            ScorerKind::RougeL => RougeLScorer::NAME,
            ScorerKind::ExactMatch => ExactMatchScorer::NAME,
            ScorerKind::TokenF1 => TokenF1Scorer::NAME,
            ScorerKind::Meteor => MeteorScorer::NAME,
            ScorerKind::Bleu => BleuScorer::NAME,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ScorerKind::Cosine => "TF-IDF cosine similarity over stemmed tokens of the pair",
            ScorerKind::RougeL => "Longest-common-subsequence F-measure over stemmed tokens",
            ScorerKind::ExactMatch => "1.0 when texts match ignoring case, accents and spacing",
            ScorerKind::TokenF1 => "F1 over the distinct-token sets of both texts",
            ScorerKind::Meteor => "Unigram alignment F-mean with a fragmentation penalty",
            ScorerKind::Bleu => "Smoothed 4-gram precision with brevity penalty",
        }
    }

    /// The metric set used when nothing else is configured
    pub fn defaults() -> Vec<ScorerKind> {
        vec![
            ScorerKind::Cosine,
            ScorerKind::RougeL,
            ScorerKind::ExactMatch,
            ScorerKind::TokenF1,
            ScorerKind::Meteor,
        ]
    }

    pub fn all() -> Vec<ScorerKind> {
        let mut kinds = Self::defaults();
        kinds.push(ScorerKind::Bleu);
        kinds
    }

    pub fn is_default(&self) -> bool {
        *self != ScorerKind::Bleu
    }

    /// Construct the scorer for a corpus language
    pub fn build(&self, language: Language) -> Box<dyn Scorer> {
        self.build_with_lexicon(language, None)
    }

    /// Construct the scorer, attaching a synonym lexicon where the metric uses one
    pub fn build_with_lexicon(&self, language: Language, lexicon: Option<&Lexicon>) -> Box<dyn Scorer> {
        match self {
            ScorerKind::Cosine => Box::new(CosineScorer::new(language)),
            ScorerKind::RougeL => Box::new(RougeLScorer::new(language)),
            ScorerKind::ExactMatch => Box::new(ExactMatchScorer::new()),
            ScorerKind::TokenF1 => Box::new(TokenF1Scorer::new()),
            ScorerKind::Meteor => match lexicon {
                Some(lexicon) => Box::new(MeteorScorer::new(language).with_lexicon(lexicon.clone())),
                None => Box::new(MeteorScorer::new(language)),
            },
            ScorerKind::Bleu => Box::new(BleuScorer::new(language)),
        }
    }

    /// Parse a comma-separated list of score names
    pub fn parse_list(list: &str) -> Result<Vec<ScorerKind>, Error> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<ScorerKind>())
            .collect()
    }
}

impl fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.score_name())
    }
}

impl FromStr for ScorerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cosine_similarity" | "cosine" => Ok(ScorerKind::Cosine),
            "rouge_l_score" | "rouge_l" | "rouge" => Ok(ScorerKind::RougeL),
            "exact_match" | "exact" => Ok(ScorerKind::ExactMatch),
            "token_f1" | "f1" => Ok(ScorerKind::TokenF1),
            "meteor_score" | "meteor" => Ok(ScorerKind::Meteor),
            "bleu_score" | "bleu" => Ok(ScorerKind::Bleu),
            _ => Err(Error::UnknownScorer(s.to_string())),
        }
    }
}

impl TryFrom<String> for ScorerKind {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded() {
        assert_eq!(bounded(f64::NAN), 0.0);
        assert_eq!(bounded(1.0000000002), 1.0);
        assert_eq!(bounded(-0.1), 0.0);
        assert_eq!(bounded(0.42), 0.42);
    }

    #[test]
    fn test_kind_names_match_built_scorers() {
        for kind in ScorerKind::all() {
            let scorer = kind.build(Language::Spanish);
            assert_eq!(scorer.score_name(), kind.score_name());
            assert_eq!(scorer.metadata().name, kind.score_name());
        }
    }

    #[test]
    fn test_parse_list() {
        let kinds = ScorerKind::parse_list("token_f1, rouge ,bleu").unwrap();
        assert_eq!(kinds, vec![ScorerKind::TokenF1, ScorerKind::RougeL, ScorerKind::Bleu]);

        assert!(matches!(
            ScorerKind::parse_list("token_f1,bertscore"),
            Err(Error::UnknownScorer(_))
        ));
    }

    #[test]
    fn test_serde_matches_from_str() {
        let kinds: Vec<ScorerKind> =
            serde_json::from_str(r#"["f1", "rouge", "meteor_score"]"#).unwrap();
        assert_eq!(kinds, vec![ScorerKind::TokenF1, ScorerKind::RougeL, ScorerKind::Meteor]);
        assert_eq!(serde_json::to_string(&ScorerKind::RougeL).unwrap(), "\"rouge_l_score\"");
        assert!(serde_json::from_str::<ScorerKind>("\"bertscore\"").is_err());
    }

    #[test]
    fn test_defaults_exclude_bleu() {
        let defaults = ScorerKind::defaults();
        assert_eq!(defaults.len(), 5);
        assert!(!defaults.contains(&ScorerKind::Bleu));
        assert!(defaults.iter().all(|k| k.is_default()));
    }
}
