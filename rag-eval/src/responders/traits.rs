//! Response source trait definitions

use async_trait::async_trait;

/// Error types for response collection
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited: retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("Timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Something that answers queries: the RAG system under test, or a
/// recording of one.
///
/// `Ok(None)` means the system produced no answer, which is a normal outcome
/// and not retried. Errors are transient failures the collector may retry.
#[async_trait]
pub trait ResponseSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Ask one question
    async fn send_query(&self, query: &str) -> SourceResult<Option<String>>;

    /// Check if the source is reachable
    async fn health_check(&self) -> SourceResult<bool>;
}

/// Trim a raw answer; blank answers count as no answer
pub fn clean_response(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
