//! Results reporting

pub mod csv_writer;

pub use csv_writer::{write_results, write_results_csv};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use rageval::ScoredRow;

/// Error type for writing reports
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSON summary export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub timestamp: String,
    pub total_rows: usize,
    pub scored_rows: usize,
    pub missing_rows: usize,
    /// Mean of each metric over scored rows, in scorer order
    pub metric_means: IndexMap<String, f64>,
    /// Mean of `average_score` over scored rows; absent when nothing was scored
    pub overall_mean: Option<f64>,
    pub results_file: String,
}

impl RunSummary {
    /// Create from scored rows
    pub fn from_rows(
        run_id: impl Into<String>,
        rows: &[ScoredRow],
        score_names: &[&str],
        results_file: impl Into<String>,
    ) -> Self {
        let scored: Vec<&ScoredRow> = rows.iter().filter(|r| r.is_scored()).collect();

        let metric_means = score_names
            .iter()
            .filter_map(|name| {
                mean(scored.iter().filter_map(|r| r.score(name)))
                    .map(|m| (name.to_string(), m))
            })
            .collect();

        Self {
            run_id: run_id.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            total_rows: rows.len(),
            scored_rows: scored.len(),
            missing_rows: rows.len() - scored.len(),
            metric_means,
            overall_mean: mean(scored.iter().filter_map(|r| r.average_score)),
            results_file: results_file.into(),
        }
    }

    /// Write to JSON file
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// `results.csv` becomes `results.summary.json` in the same directory
pub fn summary_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "results".to_string());
    output.with_file_name(format!("{}.summary.json", stem))
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Generate a console report
pub fn print_console_report(summary: &RunSummary) {
    println!("\n=== RAG Evaluation Results ===\n");
    println!("Run: {}", summary.run_id);
    println!(
        "Rows: {} total, {} scored, {} without response\n",
        summary.total_rows, summary.scored_rows, summary.missing_rows
    );

    if summary.metric_means.is_empty() {
        println!("No rows were scored.");
    } else {
        println!("Mean Scores:");
        println!("{:-<50}", "");
        for (name, score) in &summary.metric_means {
            println!("  {:<22} {:.3}", name, score);
        }
        if let Some(overall) = summary.overall_mean {
            println!("{:-<50}", "");
            println!("  {:<22} {:.3}", "average_score", overall);
        }
    }

    println!("\nResults: {}", summary.results_file);
    println!("\n{:=<50}", "");
}
