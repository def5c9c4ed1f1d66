use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use super::dates::{coerce_dates, is_date_column};
use super::{
    AxisValues, ChartData, ChartFailure, ChartId, ChartKind, ChartPanel, ChartSpec, ColorScale,
    Template,
};
use crate::data::model::{Column, Dataset};
use crate::data::stats::correlation_matrix;
use crate::error::{ChartError, Severity};

pub const DATE_COLUMN: &str = "Date";
pub const CLOSE_COLUMN: &str = "Close";
pub const VOLUME_COLUMN: &str = "Volume";

// ---------------------------------------------------------------------------
// Chart selection
// ---------------------------------------------------------------------------

/// Which charts the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartToggles {
    pub close_price: bool,
    pub volume: bool,
    pub correlation: bool,
    pub custom_analysis: bool,
}

impl Default for ChartToggles {
    fn default() -> Self {
        Self {
            close_price: true,
            volume: true,
            correlation: true,
            custom_analysis: true,
        }
    }
}

/// Requested custom-chart axes. Columns absent from the dataset fall back
/// to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomAxes {
    pub x: Option<String>,
    pub y: Option<String>,
}

/// Build a panel for every enabled, eligible chart, in page order.
///
/// A disabled chart, or one whose required columns are missing, is never
/// built and gets no panel.
pub fn configure_charts(
    dataset: &Dataset,
    toggles: &ChartToggles,
    axes: &CustomAxes,
) -> Vec<ChartPanel> {
    let mut panels = Vec::new();

    if toggles.close_price && has_columns(dataset, &[DATE_COLUMN, CLOSE_COLUMN]) {
        panels.push(ChartPanel {
            chart: ChartId::ClosingPrice,
            heading: "📉 Closing Price Over Time".to_string(),
            caption: None,
            outcome: closing_price_chart(dataset).map_err(|e| {
                failure(
                    Severity::Warning,
                    format!("Unable to display closing price over time: {e}"),
                )
            }),
        });
    }

    if toggles.volume && has_columns(dataset, &[DATE_COLUMN, VOLUME_COLUMN]) {
        panels.push(ChartPanel {
            chart: ChartId::Volume,
            heading: "📊 Volume Over Time".to_string(),
            caption: None,
            outcome: volume_chart(dataset).map_err(|e| {
                failure(Severity::Warning, format!("Unable to display volume over time: {e}"))
            }),
        });
    }

    if toggles.correlation {
        let outcome = match correlation_heatmap(dataset) {
            Ok(Some(spec)) => Ok(spec),
            Ok(None) => Err(failure(
                Severity::Warning,
                "No numerical data available for correlation heatmap.".to_string(),
            )),
            Err(e) => Err(failure(
                Severity::Error,
                format!("Error generating correlation heatmap: {e}"),
            )),
        };
        panels.push(ChartPanel {
            chart: ChartId::Correlation,
            heading: "📊 Correlation Heatmap".to_string(),
            caption: None,
            outcome,
        });
    }

    if toggles.custom_analysis {
        if let Some((x, y)) = resolve_custom_axes(dataset, axes) {
            panels.push(ChartPanel {
                chart: ChartId::Custom,
                heading: "🔎 Custom Column Analysis".to_string(),
                caption: Some(format!("Line Chart of {y} vs {x}:")),
                outcome: custom_line_chart(dataset, &x, &y).map_err(|e| {
                    failure(Severity::Error, format!("Error during custom column analysis: {e}"))
                }),
            });
        }
    }

    for panel in &panels {
        match &panel.outcome {
            Ok(spec) => match spec.to_json() {
                Ok(json) => log::debug!("{} spec: {json}", panel.heading),
                Err(e) => log::debug!("{} spec not serializable: {e}", panel.heading),
            },
            Err(f) => log::warn!("{}", f.message),
        }
    }
    panels
}

fn has_columns(dataset: &Dataset, names: &[&str]) -> bool {
    names.iter().all(|n| dataset.has_column(n))
}

fn failure(severity: Severity, message: String) -> ChartFailure {
    ChartFailure { severity, message }
}

/// The custom chart's axes: the requested columns when present, otherwise
/// the first and second column (the first twice for a single column).
pub fn resolve_custom_axes(dataset: &Dataset, axes: &CustomAxes) -> Option<(String, String)> {
    let names = dataset.column_names();
    let first = names.first()?.clone();
    let second = names.get(1).cloned().unwrap_or_else(|| first.clone());

    let pick = |requested: &Option<String>, fallback: String| {
        requested
            .as_ref()
            .filter(|name| dataset.has_column(name))
            .cloned()
            .unwrap_or(fallback)
    };
    Some((pick(&axes.x, first), pick(&axes.y, second)))
}

// ---------------------------------------------------------------------------
// Chart builders
// ---------------------------------------------------------------------------

pub fn closing_price_chart(dataset: &Dataset) -> Result<ChartSpec, ChartError> {
    let (dates, close) = time_series(dataset, CLOSE_COLUMN)?;
    Ok(ChartSpec {
        kind: ChartKind::Line,
        title: "Closing Price Over Time".to_string(),
        x_title: "Date".to_string(),
        y_title: "Closing Price".to_string(),
        labels: labels(&[(CLOSE_COLUMN, "Closing Price"), (DATE_COLUMN, "Date")]),
        template: Template::PlotlyDark,
        data: ChartData::Series {
            x_field: DATE_COLUMN.to_string(),
            y_field: CLOSE_COLUMN.to_string(),
            x: AxisValues::Dates(dates),
            y: AxisValues::Numbers(close),
        },
    })
}

pub fn volume_chart(dataset: &Dataset) -> Result<ChartSpec, ChartError> {
    let (dates, volume) = time_series(dataset, VOLUME_COLUMN)?;
    Ok(ChartSpec {
        kind: ChartKind::Bar,
        title: "Volume Over Time".to_string(),
        x_title: "Date".to_string(),
        y_title: "Volume".to_string(),
        labels: labels(&[(VOLUME_COLUMN, "Volume"), (DATE_COLUMN, "Date")]),
        template: Template::Plotly,
        data: ChartData::Series {
            x_field: DATE_COLUMN.to_string(),
            y_field: VOLUME_COLUMN.to_string(),
            x: AxisValues::Dates(dates),
            y: AxisValues::Numbers(volume),
        },
    })
}

/// Correlation heatmap over numeric columns, or `None` when there are none.
pub fn correlation_heatmap(dataset: &Dataset) -> Result<Option<ChartSpec>, ChartError> {
    if dataset.numeric_columns().next().is_none() {
        return Ok(None);
    }
    let corr = correlation_matrix(dataset)?;

    Ok(Some(ChartSpec {
        kind: ChartKind::Heatmap,
        title: "Correlation Heatmap".to_string(),
        x_title: "Features".to_string(),
        y_title: "Features".to_string(),
        labels: BTreeMap::new(),
        template: Template::PlotlyDark,
        data: ChartData::Matrix {
            labels: corr.columns,
            values: corr.values,
            color_scale: ColorScale::Viridis,
        },
    }))
}

/// Line chart of any two columns. Each axis is numeric, date-like, or
/// anything else plotted as categories. Rows missing either value are dropped.
pub fn custom_line_chart(dataset: &Dataset, x: &str, y: &str) -> Result<ChartSpec, ChartError> {
    let x_cells = AxisCells::from_column(column(dataset, x)?);
    let y_cells = AxisCells::from_column(column(dataset, y)?);

    let keep: Vec<bool> = (0..dataset.len())
        .map(|row| x_cells.is_present(row) && y_cells.is_present(row))
        .collect();
    let x_axis = x_cells.select(&keep);
    let y_axis = y_cells.select(&keep);

    if y_axis.is_empty() {
        return Err(ChartError::NoValidRows {
            x: x.to_string(),
            y: y.to_string(),
        });
    }
    for (name, axis) in [(x, &x_axis), (y, &y_axis)] {
        if let AxisValues::Numbers(v) = axis {
            if v.iter().any(|n| !n.is_finite()) {
                return Err(ChartError::NonFinite(name.to_string()));
            }
        }
    }

    Ok(ChartSpec {
        kind: ChartKind::Line,
        title: format!("Line Chart: {y} vs {x}"),
        x_title: x.to_string(),
        y_title: y.to_string(),
        labels: labels(&[(x, x), (y, y)]),
        template: Template::Plotly,
        data: ChartData::Series {
            x_field: x.to_string(),
            y_field: y.to_string(),
            x: x_axis,
            y: y_axis,
        },
    })
}

/// One column coerced to an axis type, still aligned with the dataset rows.
enum AxisCells {
    Numbers(Vec<Option<f64>>),
    Dates(Vec<Option<NaiveDateTime>>),
    Categories(Vec<Option<String>>),
}

impl AxisCells {
    fn from_column(column: &Column) -> Self {
        if let Some(numbers) = column.numeric_values() {
            AxisCells::Numbers(numbers)
        } else if is_date_column(column) {
            AxisCells::Dates(coerce_dates(column))
        } else {
            AxisCells::Categories(
                column
                    .values
                    .iter()
                    .map(|v| (!v.is_null()).then(|| v.to_string()))
                    .collect(),
            )
        }
    }

    fn is_present(&self, row: usize) -> bool {
        match self {
            AxisCells::Numbers(v) => v.get(row).is_some_and(Option::is_some),
            AxisCells::Dates(v) => v.get(row).is_some_and(Option::is_some),
            AxisCells::Categories(v) => v.get(row).is_some_and(Option::is_some),
        }
    }

    fn select(self, keep: &[bool]) -> AxisValues {
        match self {
            AxisCells::Numbers(v) => AxisValues::Numbers(kept(v, keep)),
            AxisCells::Dates(v) => AxisValues::Dates(kept(v, keep)),
            AxisCells::Categories(v) => AxisValues::Categories(kept(v, keep)),
        }
    }
}

fn kept<T>(values: Vec<Option<T>>, keep: &[bool]) -> Vec<T> {
    values
        .into_iter()
        .zip(keep)
        .filter(|(_, keep)| **keep)
        .filter_map(|(v, _)| v)
        .collect()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `Date` against a numeric column: rows with an unparseable date or a
/// missing value are dropped, the rest sorted by date.
fn time_series(
    dataset: &Dataset,
    value_column: &str,
) -> Result<(Vec<NaiveDateTime>, Vec<f64>), ChartError> {
    let dates = coerce_dates(column(dataset, DATE_COLUMN)?);
    let values = numeric(column(dataset, value_column)?)?;

    let mut points: Vec<(NaiveDateTime, f64)> = dates
        .into_iter()
        .zip(values)
        .filter_map(|(d, v)| Some((d?, v?)))
        .collect();

    let invalid = points.iter().any(|(_, v)| !v.is_finite());
    if invalid {
        return Err(ChartError::NonFinite(value_column.to_string()));
    }
    if points.is_empty() {
        return Err(ChartError::NoValidRows {
            x: DATE_COLUMN.to_string(),
            y: value_column.to_string(),
        });
    }

    points.sort_by_key(|(d, _)| *d);
    Ok(points.into_iter().unzip())
}

fn column<'a>(dataset: &'a Dataset, name: &str) -> Result<&'a Column, ChartError> {
    dataset
        .column(name)
        .ok_or_else(|| ChartError::MissingColumn(name.to_string()))
}

fn numeric(column: &Column) -> Result<Vec<Option<f64>>, ChartError> {
    column.numeric_values().ok_or_else(|| ChartError::NotNumeric {
        column: column.name.clone(),
        kind: column.kind.to_string(),
    })
}

fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
