//! HTTP client for RAG systems exposing a JSON query endpoint

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

use super::traits::{clean_response, ResponseSource, SourceError, SourceResult};
use crate::config::TargetConfig;
use crate::runner::rate_limiter::RateLimiter;

/// Posts `{"<query_field>": query}` to the target URL and reads the answer
/// found at `response_pointer` in the JSON reply
pub struct HttpResponder {
    url: String,
    query_field: String,
    response_pointer: String,
    http_client: Client,
    rate_limiter: Arc<RateLimiter>,
}

impl HttpResponder {
    /// Create a new client with the default request fields
    pub fn new(url: impl Into<String>) -> Self {
        let defaults = TargetConfig::default();
        Self {
            url: url.into(),
            query_field: defaults.query_field,
            response_pointer: defaults.response_pointer,
            http_client: Client::new(),
            rate_limiter: Arc::new(RateLimiter::new(defaults.rpm)),
        }
    }

    /// Create from the `[target]` configuration section
    pub fn from_config(config: &TargetConfig) -> SourceResult<Self> {
        if config.url.trim().is_empty() {
            return Err(SourceError::Config("target url is empty".to_string()));
        }
        if !config.response_pointer.is_empty() && !config.response_pointer.starts_with('/') {
            return Err(SourceError::Config(format!(
                "response_pointer must be a JSON pointer starting with '/': {}",
                config.response_pointer
            )));
        }

        Ok(Self::new(&config.url)
            .with_query_field(&config.query_field)
            .with_response_pointer(&config.response_pointer)
            .with_rate_limit(config.rpm))
    }

    pub fn with_query_field(mut self, field: impl Into<String>) -> Self {
        self.query_field = field.into();
        self
    }

    pub fn with_response_pointer(mut self, pointer: impl Into<String>) -> Self {
        self.response_pointer = pointer.into();
        self
    }

    /// Set custom rate limit (requests per minute)
    pub fn with_rate_limit(mut self, rpm: u32) -> Self {
        self.rate_limiter = Arc::new(RateLimiter::new(rpm));
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "detail", alias = "message")]
    error: Value,
}

/// Pull the answer out of a response body
pub fn extract_answer(body: &Value, pointer: &str) -> SourceResult<Option<String>> {
    let value = body
        .pointer(pointer)
        .ok_or_else(|| SourceError::Parse(format!("no value at {} in response", pointer)))?;

    Ok(match value {
        Value::Null => None,
        Value::String(s) => clean_response(s),
        other => clean_response(&other.to_string()),
    })
}

fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { error: Value::String(message) }) => message,
        Ok(ErrorBody { error }) => error.to_string(),
        Err(_) => format!("HTTP {}: {}", status, body),
    }
}

#[async_trait]
impl ResponseSource for HttpResponder {
    fn name(&self) -> &str {
        "http"
    }

    async fn send_query(&self, query: &str) -> SourceResult<Option<String>> {
        let _guard = self.rate_limiter.acquire().await;

        let start = Instant::now();

        let mut body = serde_json::Map::new();
        body.insert(self.query_field.clone(), Value::String(query.to_string()));

        let response = self
            .http_client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(&Value::Object(body))
            .send()
            .await?;

        let status = response.status();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;

            return Err(SourceError::RateLimited {
                retry_after_ms: retry_after,
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(status.as_u16(), &body);

            // Client errors other than rate limiting will not go away on retry
            if status.is_client_error() {
                return Err(SourceError::Config(format!(
                    "target rejected request ({}): {}",
                    status.as_u16(),
                    message
                )));
            }

            return Err(SourceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload: Value = response.json().await?;
        let answer = extract_answer(&payload, &self.response_pointer)?;

        tracing::debug!(
            "Answer for {:?} in {}ms ({} chars)",
            query,
            start.elapsed().as_millis(),
            answer.as_ref().map_or(0, |a| a.chars().count())
        );

        Ok(answer)
    }

    async fn health_check(&self) -> SourceResult<bool> {
        match self.http_client.head(&self.url).send().await {
            Ok(response) => Ok(!response.status().is_server_error()),
            Err(e) if e.is_connect() || e.is_timeout() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
