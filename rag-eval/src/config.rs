//! Configuration management for the evaluation suite
//!
//! Loads the target endpoint, collection and scoring settings from TOML files
//! and provides runtime access.

use rageval::{EvaluationManager, Language, Lexicon, ScorerKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub collection: CollectionConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// The RAG system under evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Endpoint receiving the query as a JSON POST
    #[serde(default = "default_url")]
    pub url: String,
    /// Request body field carrying the query
    #[serde(default = "default_query_field")]
    pub query_field: String,
    /// JSON pointer to the answer inside the response body
    #[serde(default = "default_response_pointer")]
    pub response_pointer: String,
    /// Requests per minute
    #[serde(default = "default_rpm")]
    pub rpm: u32,
}

/// Response collection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    #[serde(default = "default_parallel_requests")]
    pub parallel_requests: usize,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_max_retry_delay_ms")]
    pub max_retry_delay_ms: u64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Scoring settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Stemming language of the corpus
    #[serde(default)]
    pub language: Language,
    /// Active metrics, in output column order
    #[serde(default = "ScorerKind::defaults")]
    pub scorers: Vec<ScorerKind>,
    /// Synonym groups for the METEOR synonym stage (JSON)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synonyms_file: Option<PathBuf>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Write `<output>.summary.json` next to the results CSV
    #[serde(default = "default_true")]
    pub write_summary: bool,
    /// Save collected responses so the run can be re-scored offline
    #[serde(default = "default_true")]
    pub save_responses: bool,
}

/// Searched in order by [`Config::load_or_default`]
const DEFAULT_CONFIG_PATHS: [&str; 3] = [
    "config/rag-eval.toml",
    "rag-eval.toml",
    "rag-eval/config/rag-eval.toml",
];

// Default value functions
fn default_true() -> bool { true }
fn default_url() -> String { "http://localhost:8000/api/query".to_string() }
fn default_query_field() -> String { "query".to_string() }
fn default_response_pointer() -> String { "/answer".to_string() }
fn default_rpm() -> u32 { 60 }
fn default_parallel_requests() -> usize { 1 }
fn default_retry_count() -> u32 { 2 }
fn default_retry_delay_ms() -> u64 { 1000 }
fn default_max_retry_delay_ms() -> u64 { 30_000 }
fn default_timeout_ms() -> u64 { 60_000 }

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            query_field: default_query_field(),
            response_pointer: default_response_pointer(),
            rpm: default_rpm(),
        }
    }
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            parallel_requests: default_parallel_requests(),
            retry_count: default_retry_count(),
            retry_delay_ms: default_retry_delay_ms(),
            max_retry_delay_ms: default_max_retry_delay_ms(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            scorers: ScorerKind::defaults(),
            synonyms_file: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            write_summary: true,
            save_responses: true,
        }
    }
}

impl EvaluationConfig {
    /// Build the scorer set. Any error here is fatal for the run.
    pub fn build_manager(&self) -> rageval::Result<EvaluationManager> {
        let lexicon = match &self.synonyms_file {
            Some(path) => {
                let lexicon = Lexicon::from_file(path)?;
                tracing::info!(
                    "Loaded {} synonym groups from {}",
                    lexicon.groups().len(),
                    path.display()
                );
                Some(lexicon)
            }
            None => None,
        };

        EvaluationManager::from_kinds_with_lexicon(&self.scorers, self.language, lexicon.as_ref())
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from the first default config location that exists, or return
    /// defaults when none does. A file that exists but cannot be read or
    /// parsed is an error.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        Self::load_first_existing(DEFAULT_CONFIG_PATHS.into_iter().map(Path::new))
    }

    fn load_first_existing<'a>(
        paths: impl IntoIterator<Item = &'a Path>,
    ) -> Result<Self, ConfigError> {
        for path in paths {
            if path.is_file() {
                let config = Self::from_file(path)
                    .map_err(|e| e.in_file(path))?;
                tracing::info!("Loaded configuration from {}", path.display());
                return Ok(config);
            }
        }

        tracing::info!("Using default configuration");
        Ok(Self::default())
    }

    /// Save configuration to a TOML file
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        fs::write(path, content)
            .map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ConfigError {
    fn in_file(self, path: &Path) -> Self {
        match self {
            ConfigError::Io(e) => ConfigError::Io(format!("{}: {}", path.display(), e)),
            ConfigError::Parse(e) => ConfigError::Parse(format!("{}: {}", path.display(), e)),
        }
    }
}
