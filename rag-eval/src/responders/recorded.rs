//! Responses recorded from an earlier run

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use super::traits::{clean_response, ResponseSource, SourceError, SourceResult};

/// Answers stored as a JSON object mapping each query to its response.
///
/// Lets a run be re-scored offline with different metrics, and lets tests
/// drive the pipeline without a live system.
#[derive(Debug, Clone, Default)]
pub struct RecordedResponses {
    responses: HashMap<String, String>,
}

impl RecordedResponses {
    pub fn new(responses: HashMap<String, String>) -> Self {
        Self { responses }
    }

    pub fn from_json(content: &str) -> SourceResult<Self> {
        let responses: HashMap<String, String> = serde_json::from_str(content)
            .map_err(|e| SourceError::Parse(format!("invalid responses file: {}", e)))?;
        Ok(Self::new(responses))
    }

    pub fn from_file(path: impl AsRef<Path>) -> SourceResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Write a response map as pretty JSON, keys sorted for stable diffs
    pub fn save(responses: &HashMap<String, String>, path: impl AsRef<Path>) -> SourceResult<()> {
        let sorted: BTreeMap<&String, &String> = responses.iter().collect();
        let json = serde_json::to_string_pretty(&sorted)
            .map_err(|e| SourceError::Parse(e.to_string()))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

#[async_trait]
impl ResponseSource for RecordedResponses {
    fn name(&self) -> &str {
        "recorded"
    }

    async fn send_query(&self, query: &str) -> SourceResult<Option<String>> {
        Ok(self.responses.get(query).and_then(|r| clean_response(r)))
    }

    async fn health_check(&self) -> SourceResult<bool> {
        Ok(true)
    }
}
