//! RAG evaluation harness
//!
//! Sends the queries of a CSV dataset to a retrieval-augmented generation
//! system, collects its answers and scores them against the ground truth
//! with the metrics of the `rageval` crate.
//!
//! # Features
//!
//! - CSV datasets with arbitrary pass-through columns
//! - HTTP JSON targets with rate limiting, retries and timeouts
//! - Offline re-scoring from recorded responses
//! - CSV results plus a JSON run summary
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use rag_eval::{
//!     dataset::load_dataset,
//!     responders::RecordedResponses,
//!     runner::{Collector, CollectorConfig},
//! };
//! use rageval::{EvaluationManager, Language};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = EvaluationManager::with_defaults(Language::Spanish)?;
//!     let dataset = load_dataset("data/questions.csv")?;
//!
//!     let source = Arc::new(RecordedResponses::from_file("data/responses.json")?);
//!     let collector = Collector::new(source, CollectorConfig::default());
//!     let responses = collector.collect(&dataset.queries()).await;
//!
//!     let scored = manager.process_batch(&dataset.rows, &responses);
//!     println!("{} rows scored", scored.iter().filter(|r| r.is_scored()).count());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dataset;
pub mod reporting;
pub mod responders;
pub mod runner;

pub use config::Config;
pub use rageval;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::{CollectionConfig, Config, EvaluationConfig, TargetConfig};
    pub use crate::dataset::{load_dataset, Dataset, LoadError};
    pub use crate::reporting::{print_console_report, write_results_csv, ReportError, RunSummary};
    pub use crate::responders::{
        HttpResponder, RecordedResponses, ResponseSource, SourceError, SourceResult,
    };
    pub use crate::runner::{Collector, CollectorConfig, ResponseMap};
    pub use rageval::{
        EvaluationManager, EvaluationRow, Language, Scorer, ScorerKind, ScoredRow,
    };
}
