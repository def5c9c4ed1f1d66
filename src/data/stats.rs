use serde::Serialize;
use thiserror::Error;

use super::model::Dataset;

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

/// Seven-number summary (plus count) of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub name: String,
    /// Non-null values.
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation; undefined below two values.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnStats {
    /// `(label, value)` pairs in `describe()` row order.
    pub fn rows(&self) -> [(&'static str, Option<f64>); 8] {
        [
            ("count", Some(self.count as f64)),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q25),
            ("50%", self.median),
            ("75%", self.q75),
            ("max", self.max),
        ]
    }
}

/// Statistics for every numeric column, in column order. Empty when the
/// dataset has no numeric columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DescriptiveStats {
    pub columns: Vec<ColumnStats>,
}

impl DescriptiveStats {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Summarize each numeric column. Fails when an aggregate overflows to a
/// non-finite value.
pub fn describe(dataset: &Dataset) -> Result<DescriptiveStats, String> {
    let mut columns = Vec::new();
    for column in dataset.numeric_columns() {
        let mut values: Vec<f64> = column.values.iter().filter_map(|v| v.as_f64()).collect();
        let stats = summarize(&column.name, &mut values);
        let rows = stats.rows();
        let non_finite = rows.iter().find(|(_, v)| v.is_some_and(|v| !v.is_finite()));
        if let Some((label, value)) = non_finite {
            return Err(format!(
                "{label} of column '{}' is not finite ({value:?})",
                column.name
            ));
        }
        columns.push(stats);
    }
    Ok(DescriptiveStats { columns })
}

fn summarize(name: &str, values: &mut [f64]) -> ColumnStats {
    values.sort_by(f64::total_cmp);
    let count = values.len();
    let mean = mean(values);
    let std = match (mean, count) {
        (Some(m), n) if n >= 2 => {
            let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
            Some((ss / (n - 1) as f64).sqrt())
        }
        _ => None,
    };
    ColumnStats {
        name: name.to_string(),
        count,
        mean,
        std,
        min: values.first().copied(),
        q25: quantile_sorted(values, 0.25),
        median: quantile_sorted(values, 0.5),
        q75: quantile_sorted(values, 0.75),
        max: values.last().copied(),
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Quantile with linear interpolation between the closest ranks.
/// `sorted` must be in ascending order.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Pearson correlation between numeric columns. `values[i][j]` is `None`
/// where the coefficient is undefined (fewer than two shared rows, or a
/// constant column).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

/// A coefficient whose intermediate sums left the range of `f64`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("correlation of '{left}' and '{right}' is not finite")]
pub struct CorrelationOverflow {
    pub left: String,
    pub right: String,
}

/// Pairwise-complete Pearson correlation over all numeric columns.
pub fn correlation_matrix(dataset: &Dataset) -> Result<CorrelationMatrix, CorrelationOverflow> {
    let series: Vec<(String, Vec<Option<f64>>)> = dataset
        .numeric_columns()
        .filter_map(|c| c.numeric_values().map(|v| (c.name.clone(), v)))
        .collect();

    let n = series.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(&series[i].1, &series[j].1).ok_or_else(|| CorrelationOverflow {
                left: series[i].0.clone(),
                right: series[j].0.clone(),
            })?;
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: series.into_iter().map(|(name, _)| name).collect(),
        values,
    })
}

/// `Some(None)` when the coefficient is undefined, `None` on overflow.
fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<Option<f64>> {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return Some(None);
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if ![mean_x, mean_y, cov, var_x, var_y].iter().all(|v| v.is_finite()) {
        return None;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return Some(None);
    }
    let r = cov / (var_x.sqrt() * var_y.sqrt());
    if !r.is_finite() {
        return None;
    }
    Some(Some(r.clamp(-1.0, 1.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Column};

    fn float_col(name: &str, values: &[f64]) -> Column {
        Column::new(name, values.iter().map(|v| CellValue::Float(*v)).collect())
    }

    fn text_col(name: &str, values: &[&str]) -> Column {
        Column::new(name, values.iter().map(|v| CellValue::Text(v.to_string())).collect())
    }

    fn cell(corr: &CorrelationMatrix, row: usize, col: usize) -> Option<f64> {
        corr.values[row][col]
    }

    #[test]
    fn test_describe_matches_known_values() {
        let ds = Dataset::from_columns(vec![float_col("x", &[1.0, 2.0, 3.0, 4.0])]).unwrap();
        let stats = describe(&ds).unwrap();
        let x = &stats.columns[0];
        assert_eq!(x.count, 4);
        assert_eq!(x.mean, Some(2.5));
        assert!((x.std.unwrap() - 1.290_994_448_7).abs() < 1e-9);
        assert_eq!(x.min, Some(1.0));
        assert_eq!(x.q25, Some(1.75));
        assert_eq!(x.median, Some(2.5));
        assert_eq!(x.q75, Some(3.25));
        assert_eq!(x.max, Some(4.0));
    }

    #[test]
    fn test_describe_skips_nulls_and_text() {
        let ds = Dataset::from_columns(vec![
            Column::new(
                "close",
                vec![CellValue::Float(10.0), CellValue::Null, CellValue::Float(20.0)],
            ),
            text_col("symbol", &["A", "B", "C"]),
        ])
        .unwrap();
        let stats = describe(&ds).unwrap();
        assert_eq!(stats.columns.len(), 1);
        assert_eq!(stats.columns[0].name, "close");
        assert_eq!(stats.columns[0].count, 2);
    }

    #[test]
    fn test_describe_without_numeric_columns_is_empty() {
        let ds = Dataset::from_columns(vec![text_col("symbol", &["A", "B"])]).unwrap();
        let stats = describe(&ds).unwrap();
        assert!(stats.is_empty());
    }

    #[test]
    fn test_describe_single_value_has_no_std() {
        let ds = Dataset::from_columns(vec![float_col("x", &[5.0])]).unwrap();
        let stats = describe(&ds).unwrap();
        assert_eq!(stats.columns[0].std, None);
        assert_eq!(stats.columns[0].median, Some(5.0));
    }

    #[test]
    fn test_describe_overflow_is_an_error() {
        let ds = Dataset::from_columns(vec![float_col("huge", &[f64::MAX, f64::MAX])]).unwrap();
        let err = describe(&ds).unwrap_err();
        assert!(err.contains("huge"), "{err}");
    }

    #[test]
    fn test_correlation_matrix_properties() {
        let x: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| v * 2.0 + 1.0 + (v * 0.7).sin()).collect();
        let z: Vec<f64> = x.iter().map(|v| -v * 1.5 + 10.0).collect();
        let ds = Dataset::from_columns(vec![
            float_col("x", &x),
            float_col("y", &y),
            text_col("label", &vec!["t"; 50]),
            float_col("z", &z),
        ])
        .unwrap();

        let corr = correlation_matrix(&ds).unwrap();
        assert_eq!(corr.columns, vec!["x", "y", "z"]);
        for i in 0..3 {
            assert!((cell(&corr, i, i).unwrap() - 1.0).abs() < 1e-9);
            for j in 0..3 {
                let v = cell(&corr, i, j).unwrap();
                assert!((-1.0..=1.0).contains(&v));
                assert_eq!(cell(&corr, i, j), cell(&corr, j, i));
            }
        }
        assert!(cell(&corr, 0, 1).unwrap() > 0.9);
        assert!(cell(&corr, 0, 2).unwrap() < -0.99);
    }

    #[test]
    fn test_constant_column_correlation_is_undefined() {
        let ds = Dataset::from_columns(vec![
            float_col("flat", &[3.0, 3.0, 3.0]),
            float_col("x", &[1.0, 2.0, 3.0]),
        ])
        .unwrap();
        let corr = correlation_matrix(&ds).unwrap();
        assert_eq!(cell(&corr, 0, 0), None);
        assert_eq!(cell(&corr, 0, 1), None);
        assert!((cell(&corr, 1, 1).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_uses_pairwise_complete_rows() {
        let ds = Dataset::from_columns(vec![
            Column::new(
                "a",
                vec![
                    CellValue::Float(1.0),
                    CellValue::Float(2.0),
                    CellValue::Null,
                    CellValue::Float(4.0),
                ],
            ),
            float_col("b", &[2.0, 4.0, 100.0, 8.0]),
        ])
        .unwrap();
        let corr = correlation_matrix(&ds).unwrap();
        assert!((cell(&corr, 0, 1).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_overflow_is_an_error() {
        let ds = Dataset::from_columns(vec![
            float_col("huge", &[f64::MAX, f64::MAX, 0.0]),
            float_col("x", &[1.0, 2.0, 3.0]),
        ])
        .unwrap();
        let err = correlation_matrix(&ds).unwrap_err();
        assert_eq!(err.left, "huge");
        assert_eq!(err.right, "huge");
        assert!(err.to_string().contains("not finite"));
    }
}
