use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};

use super::model::{CellValue, Column, Dataset};
use crate::error::PipelineError;

/// Tokens read as missing values, matching the pandas `read_csv` defaults.
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the named file from `dir`, mapping any failure to `LoadFailure`.
pub fn load_dataset(dir: &Path, file_name: &str) -> Result<Dataset, PipelineError> {
    let path = dir.join(file_name);
    load_csv(&path).map_err(|e| PipelineError::LoadFailure {
        file: file_name.to_string(),
        message: format!("{e:#}"),
    })
}

/// Reject datasets without any data rows.
pub fn validate(dataset: Dataset) -> Result<Dataset, PipelineError> {
    if dataset.is_empty() {
        return Err(PipelineError::EmptyDataset);
    }
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: one header row with column names, then data rows.
/// Short rows are padded with nulls; a row longer than the header fails.
pub fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        bail!("No columns to parse from file");
    }
    let headers = dedupe_headers(headers);

    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {}", row_no + 1))?;
        if record.len() > headers.len() {
            bail!(
                "CSV row {}: expected {} fields, saw {}",
                row_no + 1,
                headers.len(),
                record.len()
            );
        }
        for (col_idx, column) in cells.iter_mut().enumerate() {
            column.push(record.get(col_idx).map_or(CellValue::Null, guess_cell_type));
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    let dataset = Dataset::from_columns(columns).context("assembling columns")?;

    log::info!(
        "Loaded {} rows with columns {:?} from {}",
        dataset.len(),
        dataset.column_names(),
        path.display()
    );
    Ok(dataset)
}

/// Rename repeated header names to `name.1`, `name.2`, ...
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    headers
        .into_iter()
        .map(|name| {
            if seen.insert(name.clone()) {
                return name;
            }
            let mut n = 1;
            loop {
                let candidate = format!("{name}.{n}");
                if seen.insert(candidate.clone()) {
                    return candidate;
                }
                n += 1;
            }
        })
        .collect()
}

fn guess_cell_type(s: &str) -> CellValue {
    if NA_TOKENS.contains(&s) {
        return CellValue::Null;
    }
    let trimmed = s.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        if f.is_finite() {
            return CellValue::Float(f);
        }
    }
    match trimmed {
        "true" | "True" | "TRUE" => return CellValue::Bool(true),
        "false" | "False" | "FALSE" => return CellValue::Bool(false),
        _ => {}
    }
    CellValue::Text(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ColumnKind;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, name: &str, body: &str) {
        std::fs::write(dir.path().join(name), body).unwrap();
    }

    #[test]
    fn test_row_and_column_counts_match_csv() {
        let dir = TempDir::new().unwrap();
        write_csv(
            &dir,
            "nifty.csv",
            concat!(
                "Date,Close,Volume\n",
                "2024-01-01,100.5,1000\n",
                "2024-01-02,101.0,1200\n",
                "2024-01-03,99.5,900\n",
            ),
        );

        let ds = load_dataset(dir.path(), "nifty.csv").unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.column_names(), vec!["Date", "Close", "Volume"]);
        assert_eq!(ds.column("Close").unwrap().kind, ColumnKind::Float);
        assert_eq!(ds.column("Volume").unwrap().kind, ColumnKind::Integer);
        assert_eq!(ds.column("Date").unwrap().kind, ColumnKind::Text);
    }

    #[test]
    fn test_na_tokens_become_null() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "gaps.csv", "a,b\n1,NA\n,2.5\nnan,null\n");

        let ds = load_dataset(dir.path(), "gaps.csv").unwrap();
        let a = ds.column("a").unwrap();
        let b = ds.column("b").unwrap();
        assert_eq!(a.null_count(), 2);
        assert_eq!(b.null_count(), 2);
        assert_eq!(a.kind, ColumnKind::Integer);
        assert_eq!(b.kind, ColumnKind::Float);
    }

    #[test]
    fn test_long_row_is_load_failure() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "bad.csv", "a,b\n1,2\n3,4,5\n");

        let err = load_dataset(dir.path(), "bad.csv").unwrap_err();
        match err {
            PipelineError::LoadFailure { file, message } => {
                assert_eq!(file, "bad.csv");
                assert!(message.contains("CSV row 2"), "{message}");
                assert!(message.contains("expected 2 fields, saw 3"), "{message}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_short_row_is_padded_with_nulls() {
        let dir = TempDir::new().unwrap();
        write_csv(
            &dir,
            "short.csv",
            "Date,Close,Volume\n2024-01-01,10,100\n2024-01-02,11\n",
        );

        let ds = load_dataset(dir.path(), "short.csv").unwrap();
        assert_eq!(ds.len(), 2);
        let volume = ds.column("Volume").unwrap();
        assert_eq!(volume.values, vec![CellValue::Integer(100), CellValue::Null]);
        assert_eq!(volume.kind, ColumnKind::Integer);
        assert_eq!(ds.column("Close").unwrap().null_count(), 0);
    }

    #[test]
    fn test_invalid_utf8_is_load_failure() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("latin1.csv"), b"name\n\xe9t\xe9\n").unwrap();

        let err = load_dataset(dir.path(), "latin1.csv").unwrap_err();
        assert!(matches!(err, PipelineError::LoadFailure { .. }));
    }

    #[test]
    fn test_empty_file_is_load_failure() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "empty.csv", "");

        let err = load_dataset(dir.path(), "empty.csv").unwrap_err();
        assert!(err.to_string().contains("No columns to parse"));
    }

    #[test]
    fn test_header_only_fails_validation() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "header.csv", "Date,Close\n");

        let ds = load_dataset(dir.path(), "header.csv").unwrap();
        assert_eq!(ds.column_names().len(), 2);
        assert_eq!(validate(ds).unwrap_err(), PipelineError::EmptyDataset);
    }

    #[test]
    fn test_duplicate_headers_are_renamed() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "dup.csv", "Close,Close,Close\n1,2,3\n");

        let ds = load_dataset(dir.path(), "dup.csv").unwrap();
        assert_eq!(ds.column_names(), vec!["Close", "Close.1", "Close.2"]);
    }

    #[test]
    fn test_guess_cell_type() {
        assert_eq!(guess_cell_type("42"), CellValue::Integer(42));
        assert_eq!(guess_cell_type("-3.5"), CellValue::Float(-3.5));
        assert_eq!(guess_cell_type("True"), CellValue::Bool(true));
        assert_eq!(guess_cell_type("NULL"), CellValue::Null);
        assert_eq!(guess_cell_type("inf"), CellValue::Text("inf".into()));
        assert_eq!(guess_cell_type("RELIANCE"), CellValue::Text("RELIANCE".into()));
    }
}
