//! Declarative chart descriptions, independent of the drawing backend.

pub mod configurator;
pub mod dates;

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    Heatmap,
}

/// Colour template, named after the plotly templates the dashboard mimics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Template {
    Plotly,
    PlotlyDark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScale {
    Viridis,
}

/// Values along one axis of a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "values", rename_all = "snake_case")]
pub enum AxisValues {
    Dates(Vec<NaiveDateTime>),
    Numbers(Vec<f64>),
    /// One label per point; equal labels share a position.
    Categories(Vec<String>),
}

impl AxisValues {
    pub fn len(&self) -> usize {
        match self {
            AxisValues::Dates(v) => v.len(),
            AxisValues::Numbers(v) => v.len(),
            AxisValues::Categories(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartData {
    Series {
        x_field: String,
        y_field: String,
        x: AxisValues,
        y: AxisValues,
    },
    Matrix {
        labels: Vec<String>,
        values: Vec<Vec<Option<f64>>>,
        color_scale: ColorScale,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    /// Field name → display label.
    pub labels: BTreeMap<String, String>,
    pub template: Template,
    pub data: ChartData,
}

impl ChartSpec {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Shown instead of a chart whose build failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartFailure {
    pub severity: Severity,
    pub message: String,
}

/// The four chart sections the dashboard knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartId {
    ClosingPrice,
    Volume,
    Correlation,
    Custom,
}

/// One chart section of the page: heading, optional caption, and either the
/// chart or the reason it is missing.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPanel {
    pub chart: ChartId,
    pub heading: String,
    pub caption: Option<String>,
    pub outcome: Result<ChartSpec, ChartFailure>,
}
