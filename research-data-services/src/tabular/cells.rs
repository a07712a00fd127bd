use chrono::NaiveDate;
use csv::StringRecord;
use research_core::schema::DATE_FORMAT;
use std::collections::HashMap;

use crate::error::DataError;

/// Header name → column position for one CSV file.
pub(crate) struct ColumnIndex {
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    pub(crate) fn new(headers: &StringRecord) -> Self {
        let positions = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_string(), i))
            .collect();
        Self { positions }
    }

    pub(crate) fn require(&self, column: &str) -> Result<usize, DataError> {
        self.position(column)
            .ok_or_else(|| DataError::MissingColumn(column.to_string()))
    }

    pub(crate) fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }
}

pub(crate) fn text(record: &StringRecord, pos: Option<usize>) -> String {
    pos.and_then(|p| record.get(p))
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

pub(crate) fn number(record: &StringRecord, pos: Option<usize>) -> Option<f64> {
    pos.and_then(|p| record.get(p)).and_then(parse_number)
}

pub(crate) fn date(record: &StringRecord, pos: Option<usize>) -> Option<NaiveDate> {
    pos.and_then(|p| record.get(p)).and_then(parse_date)
}

/// Parse a numeric cell. Thousands separators are dropped; empty, malformed
/// or non-finite cells are null.
pub fn parse_number(cell: &str) -> Option<f64> {
    let cleaned: String = cell.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a `YYYY-MM-DD` cell. A trailing time part is ignored; anything
/// else unparseable is null.
pub fn parse_date(cell: &str) -> Option<NaiveDate> {
    let trimmed = cell.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .ok()
        .or_else(|| {
            trimmed
                .split_whitespace()
                .next()
                .and_then(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok())
        })
}
