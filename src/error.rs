use thiserror::Error;

use crate::data::stats::CorrelationOverflow;

/// Errors that halt a render pass. Each one becomes the single banner shown
/// in place of everything after the title.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("The directory '{0}' does not exist. Please create it and add your datasets.")]
    DirectoryNotFound(String),

    #[error("No datasets found in the '{0}' directory. Please add CSV files.")]
    EmptyDirectory(String),

    #[error("Error loading the file '{file}': {message}")]
    LoadFailure { file: String, message: String },

    #[error("The selected dataset is empty. Please check the file.")]
    EmptyDataset,
}

impl PipelineError {
    /// Empty directories and empty files are the user's to fix; the rest are errors.
    pub fn severity(&self) -> Severity {
        match self {
            PipelineError::EmptyDirectory(_) | PipelineError::EmptyDataset => Severity::Warning,
            PipelineError::DirectoryNotFound(_) | PipelineError::LoadFailure { .. } => {
                Severity::Error
            }
        }
    }
}

/// Failures of a single summary section. They never leave their section.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("Error displaying the data: {0}")]
    Display(String),

    #[error("Error generating descriptive statistics: {0}")]
    Statistics(String),
}

/// Why a chart could not be built from the dataset.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChartError {
    #[error("column '{0}' not found")]
    MissingColumn(String),

    #[error("column '{column}' is not numeric (dtype {kind})")]
    NotNumeric { column: String, kind: String },

    #[error("no rows with both a valid '{x}' and '{y}' value")]
    NoValidRows { x: String, y: String },

    #[error("non-finite value computed for '{0}'")]
    NonFinite(String),

    #[error(transparent)]
    Correlation(#[from] CorrelationOverflow),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}
