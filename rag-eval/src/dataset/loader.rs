//! Dataset loading from CSV files

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use indexmap::IndexMap;
use rageval::{EvaluationRow, GROUND_TRUTH_COLUMN, QUERY_COLUMN};

use super::Dataset;

/// Error type for dataset loading
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),
}

/// Load a dataset from a CSV file with a header row
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset, LoadError> {
    let file = std::fs::File::open(path)?;
    load_dataset_from_reader(file)
}

pub fn load_dataset_from_str(content: &str) -> Result<Dataset, LoadError> {
    load_dataset_from_reader(content.as_bytes())
}

/// Parse CSV records; `query` and `ground_truth` columns are required and
/// every other column is carried through untouched
pub fn load_dataset_from_reader<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    // Rows are keyed by header name, so a repeated name would drop a value
    let mut seen = HashSet::new();
    if let Some(duplicate) = headers.iter().find(|h| !seen.insert(h.as_str())) {
        return Err(LoadError::DuplicateColumn(duplicate.clone()));
    }

    for required in [QUERY_COLUMN, GROUND_TRUTH_COLUMN] {
        if !headers.iter().any(|h| h == required) {
            return Err(LoadError::MissingColumn(required.to_string()));
        }
    }

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let columns: IndexMap<String, String> = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();

        // Both columns were checked against the header above
        if let Some(row) = EvaluationRow::from_columns(columns) {
            rows.push(row);
        }
    }

    tracing::debug!("Loaded {} rows with columns {:?}", rows.len(), headers);
    Ok(Dataset { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_with_extra_columns() {
        let csv = "id,query,ground_truth,topic\n\
                   1,¿Qué come el gato?,\"El gato come pescado, a veces carne\",animales\n\
                   2,¿Capital de Francia?,París,geografía\n";
        let dataset = load_dataset_from_str(csv).unwrap();

        assert_eq!(dataset.headers, vec!["id", "query", "ground_truth", "topic"]);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.rows[0].ground_truth, "El gato come pescado, a veces carne");
        assert_eq!(dataset.rows[1].columns["topic"], "geografía");
        let keys: Vec<&str> = dataset.rows[0].columns.keys().map(String::as_str).collect();
        assert_eq!(keys, dataset.headers);
    }

    #[test]
    fn test_missing_ground_truth_column() {
        let csv = "query,answer\nhola,mundo\n";
        let err = load_dataset_from_str(csv).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(c) if c == "ground_truth"));
    }

    #[test]
    fn test_duplicate_column_is_rejected() {
        let csv = "note,query,ground_truth,note\nfirst,q,a,second\n";
        let err = load_dataset_from_str(csv).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateColumn(c) if c == "note"));
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let csv = "query,ground_truth\nhola,mundo,extra\n";
        assert!(matches!(load_dataset_from_str(csv), Err(LoadError::Csv(_))));
    }

    #[test]
    fn test_bom_in_header() {
        let csv = "\u{feff}query,ground_truth\nhola,mundo\n";
        let dataset = load_dataset_from_str(csv).unwrap();
        assert_eq!(dataset.rows[0].query, "hola");
    }

    #[test]
    fn test_distinct_queries() {
        let csv = "query,ground_truth\na,1\nb,2\na,3\n";
        let dataset = load_dataset_from_str(csv).unwrap();
        assert_eq!(dataset.queries(), vec!["a", "b"]);
    }

    #[test]
    fn test_truncate_keeps_leading_rows() {
        let csv = "query,ground_truth\na,1\nb,2\nc,3\n";
        let mut dataset = load_dataset_from_str(csv).unwrap();
        dataset.truncate(2);
        assert_eq!(dataset.queries(), vec!["a", "b"]);
        dataset.truncate(10);
        assert_eq!(dataset.len(), 2);
    }
}
