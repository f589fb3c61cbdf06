//! CSV import of recovery-log style exports into [`KpiRecord`]s.

use std::io::Read;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::record::KpiRecord;

const TIMESTAMP_COLUMN: &str = "timestamp";
const CATEGORY_COLUMN: &str = "category";

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("row {row}: unable to parse timestamp '{value}'")]
    InvalidTimestamp { row: usize, value: String },
    #[error("row {row}: column '{column}' has unparseable value '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
}

/// Parse a CSV with `timestamp` and `category` columns. Every other column
/// becomes a flag (`true`/`false`) or a numeric field per cell; empty cells
/// are skipped. Rows are numbered from 1, excluding the header.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<KpiRecord>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let timestamp_index = column_index(&headers, TIMESTAMP_COLUMN)?;
    let category_index = column_index(&headers, CATEGORY_COLUMN)?;

    let mut records = Vec::new();
    for (offset, row) in csv_reader.records().enumerate() {
        let row = row?;
        let row_number = offset + 1;

        let raw_timestamp = row.get(timestamp_index).unwrap_or_default();
        let timestamp =
            parse_timestamp(raw_timestamp).ok_or_else(|| ImportError::InvalidTimestamp {
                row: row_number,
                value: raw_timestamp.to_string(),
            })?;
        let category = row.get(category_index).unwrap_or_default();
        let mut record = KpiRecord::new(timestamp, category);

        for (index, (column, cell)) in headers.iter().zip(row.iter()).enumerate() {
            if index == timestamp_index || index == category_index || cell.is_empty() {
                continue;
            }

            match parse_cell(cell) {
                Some(Cell::Flag(value)) => {
                    record.flags.insert(column.to_string(), value);
                }
                Some(Cell::Number(value)) => {
                    record.numeric_fields.insert(column.to_string(), value);
                }
                None => {
                    return Err(ImportError::InvalidValue {
                        row: row_number,
                        column: column.to_string(),
                        value: cell.to_string(),
                    })
                }
            }
        }

        records.push(record);
    }

    Ok(records)
}

enum Cell {
    Flag(bool),
    Number(f64),
}

fn parse_cell(cell: &str) -> Option<Cell> {
    if cell.eq_ignore_ascii_case("true") {
        return Some(Cell::Flag(true));
    }
    if cell.eq_ignore_ascii_case("false") {
        return Some(Cell::Flag(false));
    }
    cell.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(Cell::Number)
}

fn column_index(headers: &csv::StringRecord, name: &'static str) -> Result<usize, ImportError> {
    headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(name))
        .ok_or(ImportError::MissingColumn(name))
}

/// RFC 3339, `YYYY-MM-DD HH:MM:SS` (UTC) or a bare date at midnight UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
