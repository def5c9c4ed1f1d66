use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a loaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the dtypes a CSV column can infer to.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` when it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Column – one named column with an inferred kind
// ---------------------------------------------------------------------------

/// Inferred column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Bool,
    Text,
    /// Every cell is missing, so nothing can be inferred.
    Empty,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Integer => "int64",
            ColumnKind::Float => "float64",
            ColumnKind::Bool => "bool",
            ColumnKind::Text => "object",
            ColumnKind::Empty => "empty",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<CellValue>,
}

impl Column {
    /// Build a column from already-typed cells, inferring its kind.
    ///
    /// A column mixing integers and floats is widened to `Float`; any other
    /// mixture collapses to `Text` with every non-null cell rendered as text.
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        let kind = infer_kind(&values);
        let values = match kind {
            ColumnKind::Float => values
                .into_iter()
                .map(|v| match v {
                    CellValue::Integer(i) => CellValue::Float(i as f64),
                    other => other,
                })
                .collect(),
            ColumnKind::Text => values
                .into_iter()
                .map(|v| match v {
                    CellValue::Null => CellValue::Null,
                    CellValue::Text(s) => CellValue::Text(s),
                    other => CellValue::Text(other.to_string()),
                })
                .collect(),
            _ => values,
        };
        Column {
            name: name.into(),
            kind,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// Numeric view of the column, `None` for missing cells.
    /// Returns `None` altogether when the column is not numeric.
    pub fn numeric_values(&self) -> Option<Vec<Option<f64>>> {
        if !self.kind.is_numeric() {
            return None;
        }
        Some(self.values.iter().map(CellValue::as_f64).collect())
    }
}

fn infer_kind(values: &[CellValue]) -> ColumnKind {
    let mut seen_int = false;
    let mut seen_float = false;
    let mut seen_bool = false;
    let mut seen_text = false;
    for v in values {
        match v {
            CellValue::Integer(_) => seen_int = true,
            CellValue::Float(_) => seen_float = true,
            CellValue::Bool(_) => seen_bool = true,
            CellValue::Text(_) => seen_text = true,
            CellValue::Null => {}
        }
    }
    match (seen_int, seen_float, seen_bool, seen_text) {
        (false, false, false, false) => ColumnKind::Empty,
        (true, false, false, false) => ColumnKind::Integer,
        (_, true, false, false) => ColumnKind::Float,
        (false, false, true, false) => ColumnKind::Bool,
        _ => ColumnKind::Text,
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("column '{column}' has {actual} values, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        actual: usize,
    },
    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),
}

/// An in-memory table: ordered named columns of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: usize,
}

impl Dataset {
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, ShapeError> {
        let rows = columns.first().map(Column::len).unwrap_or(0);
        let mut names = HashSet::new();
        for col in &columns {
            if col.len() != rows {
                return Err(ShapeError::RaggedColumn {
                    column: col.name.clone(),
                    expected: rows,
                    actual: col.len(),
                });
            }
            if !names.insert(col.name.as_str()) {
                return Err(ShapeError::DuplicateColumn(col.name.clone()));
            }
        }
        Ok(Dataset { columns, rows })
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Columns whose non-null values are all numeric, in column order.
    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.kind.is_numeric())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_int_float_widens_to_float() {
        let col = Column::new(
            "price",
            vec![CellValue::Integer(1), CellValue::Float(2.5), CellValue::Null],
        );
        assert_eq!(col.kind, ColumnKind::Float);
        assert_eq!(col.values[0], CellValue::Float(1.0));
        assert_eq!(col.null_count(), 1);
    }

    #[test]
    fn test_mixed_text_collapses_to_text() {
        let col = Column::new(
            "mixed",
            vec![CellValue::Integer(7), CellValue::Text("x".into())],
        );
        assert_eq!(col.kind, ColumnKind::Text);
        assert_eq!(col.values[0], CellValue::Text("7".into()));
        assert!(col.numeric_values().is_none());
    }

    #[test]
    fn test_all_null_column_is_empty_kind() {
        let col = Column::new("blank", vec![CellValue::Null, CellValue::Null]);
        assert_eq!(col.kind, ColumnKind::Empty);
        assert!(!col.kind.is_numeric());
    }

    #[test]
    fn test_ragged_columns_rejected() {
        let err = Dataset::from_columns(vec![
            Column::new("a", vec![CellValue::Integer(1), CellValue::Integer(2)]),
            Column::new("b", vec![CellValue::Integer(1)]),
        ])
        .unwrap_err();
        assert!(matches!(err, ShapeError::RaggedColumn { actual: 1, .. }));
    }

    #[test]
    fn test_numeric_columns_preserve_order() {
        let ds = Dataset::from_columns(vec![
            Column::new("z", vec![CellValue::Float(1.0)]),
            Column::new("name", vec![CellValue::Text("a".into())]),
            Column::new("a", vec![CellValue::Integer(3)]),
        ])
        .unwrap();
        let names: Vec<&str> = ds.numeric_columns().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["z", "a"]);
        assert_eq!(ds.len(), 1);
    }
}
