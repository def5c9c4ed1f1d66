use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::data::model::{CellValue, Column};

/// Date-time layouts tried before the date-only ones.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Month-first layouts precede day-first ones for ambiguous input.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%m-%d-%Y", "%d-%m-%Y", "%d-%b-%Y",
    "%d %b %Y", "%Y%m%d",
];

/// Parse a date or date-time; `None` when no known layout matches.
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Coerce every cell of `column` to a date. Cells that do not parse become
/// `None` rather than failing the whole column.
pub fn coerce_dates(column: &Column) -> Vec<Option<NaiveDateTime>> {
    column
        .values
        .iter()
        .map(|v| match v {
            CellValue::Text(s) => parse_date(s),
            CellValue::Integer(i) => parse_date(&i.to_string()),
            _ => None,
        })
        .collect()
}

/// Whether every non-null cell of `column` reads as a date.
pub fn is_date_column(column: &Column) -> bool {
    let parsed = coerce_dates(column);
    let mut any = false;
    for (cell, date) in column.values.iter().zip(&parsed) {
        if cell.is_null() {
            continue;
        }
        if date.is_none() {
            return false;
        }
        any = true;
    }
    any
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_common_layouts() {
        assert_eq!(parse_date("2024-03-04"), Some(ymd(2024, 3, 4)));
        assert_eq!(parse_date("2024/03/04"), Some(ymd(2024, 3, 4)));
        assert_eq!(parse_date("03/04/2024"), Some(ymd(2024, 3, 4)));
        assert_eq!(parse_date("25/12/2023"), Some(ymd(2023, 12, 25)));
        assert_eq!(parse_date("04-Mar-2024"), Some(ymd(2024, 3, 4)));
        assert_eq!(parse_date("20240304"), Some(ymd(2024, 3, 4)));
        assert_eq!(
            parse_date("2024-03-04 15:30:00"),
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap().and_hms_opt(15, 30, 0)
        );
    }

    #[test]
    fn test_unparseable_becomes_none() {
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2024-13-45"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_coerce_keeps_row_alignment() {
        let col = Column::new(
            "Date",
            vec![
                CellValue::Text("2024-01-01".into()),
                CellValue::Text("garbage".into()),
                CellValue::Null,
            ],
        );
        let dates = coerce_dates(&col);
        assert_eq!(dates.len(), 3);
        assert_eq!(dates[0], Some(ymd(2024, 1, 1)));
        assert_eq!(dates[1], None);
        assert_eq!(dates[2], None);
        assert!(!is_date_column(&col));
    }
}
