//! Scored results as CSV

use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

use rageval::{ScoredRow, ACTUAL_RESPONSE_COLUMN, AVERAGE_SCORE_COLUMN};

use super::ReportError;
use crate::dataset::Dataset;

/// Write the scored dataset to a CSV file.
///
/// Columns are the input columns in their original order, then
/// `actual_response`, one column per metric in `score_names` order, then
/// `average_score`. Input columns that collide with one of those derived
/// names are dropped so a results file can be fed back in and re-scored.
/// Missing values become empty cells.
pub fn write_results_csv(
    path: impl AsRef<Path>,
    dataset: &Dataset,
    rows: &[ScoredRow],
    score_names: &[&str],
) -> Result<(), ReportError> {
    let file = std::fs::File::create(path.as_ref())?;
    write_results(file, dataset, rows, score_names)?;
    tracing::info!("Wrote {} rows to {}", rows.len(), path.as_ref().display());
    Ok(())
}

/// Same as [`write_results_csv`] for any writer
pub fn write_results<W: Write>(
    writer: W,
    dataset: &Dataset,
    rows: &[ScoredRow],
    score_names: &[&str],
) -> Result<(), ReportError> {
    let derived: HashSet<&str> = score_names
        .iter()
        .copied()
        .chain([ACTUAL_RESPONSE_COLUMN, AVERAGE_SCORE_COLUMN])
        .collect();

    let passthrough: Vec<&str> = dataset
        .headers
        .iter()
        .map(String::as_str)
        .filter(|h| !derived.contains(h))
        .collect();

    let mut wtr = csv::Writer::from_writer(writer);

    let header = passthrough
        .iter()
        .copied()
        .chain([ACTUAL_RESPONSE_COLUMN])
        .chain(score_names.iter().copied())
        .chain([AVERAGE_SCORE_COLUMN]);
    wtr.write_record(header)?;

    for scored in rows {
        let mut record: Vec<String> = passthrough
            .iter()
            .map(|h| scored.row.columns.get(*h).cloned().unwrap_or_default())
            .collect();

        record.push(scored.actual_response.clone().unwrap_or_default());
        for name in score_names {
            record.push(format_score(scored.score(name)));
        }
        record.push(format_score(scored.average_score));

        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

fn format_score(score: Option<f64>) -> String {
    score.map(|s| s.to_string()).unwrap_or_default()
}
