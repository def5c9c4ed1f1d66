use super::model::{CellValue, Dataset};
use super::stats::{self, DescriptiveStats};
use crate::error::ReportError;

/// The first rows of the dataset, every column, original order.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

/// Missing-value count of one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSummary {
    pub column: String,
    pub missing: usize,
}

/// Everything shown between the load banner and the charts.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub preview: Result<Preview, ReportError>,
    pub missing: Vec<ColumnSummary>,
    pub statistics: Result<DescriptiveStats, ReportError>,
}

/// Run the three summary computations. A failing section is reported in
/// place and never stops the others.
pub fn build_report(dataset: &Dataset, preview_rows: usize) -> Report {
    let preview = preview(dataset, preview_rows);
    if let Err(e) = &preview {
        log::warn!("{e}");
    }

    let statistics = stats::describe(dataset).map_err(ReportError::Statistics);
    if let Err(e) = &statistics {
        log::warn!("{e}");
    }

    Report {
        preview,
        missing: missing_values(dataset),
        statistics,
    }
}

pub fn preview(dataset: &Dataset, limit: usize) -> Result<Preview, ReportError> {
    let n = dataset.len().min(limit);
    let mut rows = Vec::with_capacity(n);
    for row in 0..n {
        let cells = dataset
            .columns()
            .iter()
            .map(|col| {
                col.values.get(row).cloned().ok_or_else(|| {
                    ReportError::Display(format!("row {row} missing from column '{}'", col.name))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(cells);
    }
    Ok(Preview {
        columns: dataset.column_names(),
        rows,
    })
}

pub fn missing_values(dataset: &Dataset) -> Vec<ColumnSummary> {
    dataset
        .columns()
        .iter()
        .map(|col| ColumnSummary {
            column: col.name.clone(),
            missing: col.null_count(),
        })
        .collect()
}
