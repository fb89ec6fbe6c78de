//! Async response collector

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::sleep;

use crate::config::CollectionConfig;
use crate::responders::{ResponseSource, SourceError};

/// Collected answers keyed by query. Queries without an answer are absent.
pub type ResponseMap = HashMap<String, String>;

/// Configuration for the collector
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Maximum queries in flight
    pub parallel_requests: usize,
    /// Number of retries on failure
    pub retry_count: u32,
    /// Initial retry delay in milliseconds
    pub retry_delay_ms: u64,
    /// Maximum retry delay in milliseconds
    pub max_retry_delay_ms: u64,
    /// Per-attempt timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        CollectionConfig::default().into()
    }
}

impl From<CollectionConfig> for CollectorConfig {
    fn from(config: CollectionConfig) -> Self {
        Self {
            parallel_requests: config.parallel_requests.max(1),
            retry_count: config.retry_count,
            retry_delay_ms: config.retry_delay_ms,
            max_retry_delay_ms: config.max_retry_delay_ms,
            timeout_ms: config.timeout_ms,
        }
    }
}

/// Sends every query to a response source and gathers the answers
pub struct Collector {
    config: CollectorConfig,
    source: Arc<dyn ResponseSource>,
    semaphore: Arc<Semaphore>,
    progress: Arc<dyn ProgressCallback>,
}

impl Collector {
    /// Create a new collector
    pub fn new(source: Arc<dyn ResponseSource>, config: CollectorConfig) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.parallel_requests.max(1)));
        Self {
            config,
            source,
            semaphore,
            progress: Arc::new(NoOpProgress),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = progress;
        self
    }

    /// Ask every query, in parallel up to `parallel_requests`.
    ///
    /// Failures are logged and leave the query out of the result; they never
    /// abort collection.
    pub async fn collect(&self, queries: &[String]) -> ResponseMap {
        let total = queries.len();
        let completed = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::new();

        for query in queries {
            let query = query.clone();
            let collector = self.clone_for_task();
            let completed = completed.clone();

            let handle = tokio::spawn(async move {
                let answer = collector.query_with_retry(&query).await;
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                collector.progress.on_progress(done, total);
                (query, answer)
            });

            handles.push(handle);
        }

        let mut responses = ResponseMap::new();
        for handle in handles {
            match handle.await {
                Ok((query, Some(answer))) => {
                    responses.insert(query, answer);
                }
                Ok((query, None)) => {
                    tracing::warn!("No response received for query: {}", query);
                }
                Err(e) => {
                    tracing::error!("Query task panicked: {}", e);
                }
            }
        }

        tracing::info!(
            "Collected {} of {} responses from {}",
            responses.len(),
            total,
            self.source.name()
        );
        responses
    }

    /// Ask one query, retrying transient failures with exponential backoff
    pub async fn query_with_retry(&self, query: &str) -> Option<String> {
        let Ok(_permit) = self.semaphore.acquire().await else {
            tracing::error!("Collector semaphore closed");
            return None;
        };

        self.progress.on_query_start(query);

        let mut delay = self.config.retry_delay_ms;

        for attempt in 0..=self.config.retry_count {
            if attempt > 0 {
                tracing::info!("Retry {} for query {:?} on {}", attempt, query, self.source.name());
                sleep(Duration::from_millis(delay)).await;
                delay = (delay * 2).min(self.config.max_retry_delay_ms);
            }

            match self.try_query(query).await {
                Ok(answer) => {
                    self.progress.on_query_complete(query, answer.is_some());
                    return answer;
                }
                Err(SourceError::RateLimited { retry_after_ms }) => {
                    tracing::warn!(
                        "Rate limited on {}, waiting {}ms",
                        self.source.name(),
                        retry_after_ms
                    );
                    sleep(Duration::from_millis(retry_after_ms)).await;
                }
                Err(e @ SourceError::Config(_)) => {
                    tracing::error!("Error on {} for query {:?}: {}", self.source.name(), query, e);
                    break;
                }
                Err(e) => {
                    tracing::error!("Error on {} for query {:?}: {}", self.source.name(), query, e);
                }
            }
        }

        self.progress.on_query_complete(query, false);
        None
    }

    /// Try to answer a query (single attempt)
    async fn try_query(&self, query: &str) -> Result<Option<String>, SourceError> {
        let timeout = Duration::from_millis(self.config.timeout_ms);

        match tokio::time::timeout(timeout, self.source.send_query(query)).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout {
                timeout_ms: self.config.timeout_ms,
            }),
        }
    }

    /// Clone the collector for spawning tasks
    fn clone_for_task(&self) -> Self {
        Self {
            config: self.config.clone(),
            source: self.source.clone(),
            semaphore: self.semaphore.clone(),
            progress: self.progress.clone(),
        }
    }
}

/// Progress callback for tracking collection
pub trait ProgressCallback: Send + Sync {
    fn on_query_start(&self, query: &str);
    fn on_query_complete(&self, query: &str, answered: bool);
    fn on_progress(&self, completed: usize, total: usize);
}

/// Default no-op progress callback
pub struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_query_start(&self, _query: &str) {}
    fn on_query_complete(&self, _query: &str, _answered: bool) {}
    fn on_progress(&self, _completed: usize, _total: usize) {}
}

/// Console progress callback
pub struct ConsoleProgress;

impl ProgressCallback for ConsoleProgress {
    fn on_query_start(&self, _query: &str) {}

    fn on_query_complete(&self, query: &str, answered: bool) {
        let status = if answered { "OK" } else { "NO ANSWER" };
        println!("  [{}] {}", status, query);
    }

    fn on_progress(&self, completed: usize, total: usize) {
        if completed == total || completed % 10 == 0 {
            println!("Progress: {}/{} queries", completed, total);
        }
    }
}
