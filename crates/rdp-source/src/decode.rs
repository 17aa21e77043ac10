//! Declared-type mapping and lenient cell decoding.
//!
//! Type tags are assigned once, from the declared schema type at discovery
//! time; every cell is then decoded against its column's tag. Decoding is
//! deliberately lenient: a value that cannot be represented becomes missing
//! rather than an error, so a single malformed date never sinks an import.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::{DataType, NamedFrom, Series, TimeUnit};
use rusqlite::types::Value;

use rdp_model::{epoch_days_from_date, epoch_micros_from_datetime};

use crate::error::Result;

/// Timestamp layouts accepted from text cells, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Calendar-date layouts accepted from text cells, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d-%b-%Y"];

/// Julian day number of 1970-01-01T00:00:00Z, SQLite's REAL storage origin.
const UNIX_EPOCH_JULIAN_DAY: f64 = 2_440_587.5;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Column type tag mapped from the declared schema type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    Text,
    Integer,
    Float,
    Boolean,
    Date,
    Timestamp,
}

impl SourceType {
    /// Maps a declared SQL type to its tag.
    ///
    /// Matching is case-insensitive on substrings, checked in the order
    /// below so `DATETIME` resolves before the bare `DATE` it contains.
    /// Undeclared and BLOB columns fall back to text.
    pub fn from_decl(decl: Option<&str>) -> Self {
        let Some(decl) = decl else {
            return SourceType::Text;
        };
        let upper = decl.to_uppercase();
        if upper.contains("DATETIME") || upper.contains("TIMESTAMP") {
            SourceType::Timestamp
        } else if upper.contains("DATE") {
            SourceType::Date
        } else if upper.contains("BOOL") {
            SourceType::Boolean
        } else if upper.contains("INT") {
            SourceType::Integer
        } else if upper.contains("CHAR") || upper.contains("CLOB") || upper.contains("TEXT") {
            SourceType::Text
        } else if upper.contains("REAL")
            || upper.contains("FLOA")
            || upper.contains("DOUB")
            || upper.contains("DECI")
            || upper.contains("NUMERIC")
        {
            SourceType::Float
        } else {
            SourceType::Text
        }
    }

    /// The polars dtype a column of this tag materializes as.
    pub fn dtype(&self) -> DataType {
        match self {
            SourceType::Text => DataType::String,
            SourceType::Integer => DataType::Int64,
            SourceType::Float => DataType::Float64,
            SourceType::Boolean => DataType::Boolean,
            SourceType::Date => DataType::Date,
            SourceType::Timestamp => DataType::Datetime(TimeUnit::Microseconds, None),
        }
    }

    /// Short label for terminal output.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Text => "text",
            SourceType::Integer => "integer",
            SourceType::Float => "float",
            SourceType::Boolean => "boolean",
            SourceType::Date => "date",
            SourceType::Timestamp => "timestamp",
        }
    }
}

/// Per-column accumulator that decodes cells as rows stream in.
#[derive(Debug)]
pub enum ColumnBuffer {
    Text(Vec<Option<String>>),
    Integer(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Boolean(Vec<Option<bool>>),
    Date(Vec<Option<i32>>),
    Timestamp(Vec<Option<i64>>),
}

impl ColumnBuffer {
    pub fn for_kind(kind: SourceType) -> Self {
        match kind {
            SourceType::Text => ColumnBuffer::Text(Vec::new()),
            SourceType::Integer => ColumnBuffer::Integer(Vec::new()),
            SourceType::Float => ColumnBuffer::Float(Vec::new()),
            SourceType::Boolean => ColumnBuffer::Boolean(Vec::new()),
            SourceType::Date => ColumnBuffer::Date(Vec::new()),
            SourceType::Timestamp => ColumnBuffer::Timestamp(Vec::new()),
        }
    }

    /// Decodes one cell into the buffer; unrepresentable values become
    /// missing.
    pub fn push(&mut self, value: Value) {
        match self {
            ColumnBuffer::Text(values) => values.push(decode_text(value)),
            ColumnBuffer::Integer(values) => values.push(decode_integer(value)),
            ColumnBuffer::Float(values) => values.push(decode_float(value)),
            ColumnBuffer::Boolean(values) => values.push(decode_boolean(value)),
            ColumnBuffer::Date(values) => {
                values.push(decode_date(value).map(epoch_days_from_date));
            }
            ColumnBuffer::Timestamp(values) => {
                values.push(decode_timestamp(value).map(epoch_micros_from_datetime));
            }
        }
    }

    /// Finishes the buffer as a typed series.
    pub fn into_series(self, name: &str) -> Result<Series> {
        let series = match self {
            ColumnBuffer::Text(values) => Series::new(name.into(), values),
            ColumnBuffer::Integer(values) => Series::new(name.into(), values),
            ColumnBuffer::Float(values) => Series::new(name.into(), values),
            ColumnBuffer::Boolean(values) => Series::new(name.into(), values),
            ColumnBuffer::Date(values) => {
                Series::new(name.into(), values).cast(&DataType::Date)?
            }
            ColumnBuffer::Timestamp(values) => Series::new(name.into(), values)
                .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?,
        };
        Ok(series)
    }
}

fn decode_text(value: Value) -> Option<String> {
    match value {
        Value::Text(text) => Some(text),
        Value::Integer(int) => Some(int.to_string()),
        Value::Real(real) => Some(real.to_string()),
        Value::Null | Value::Blob(_) => None,
    }
}

fn decode_integer(value: Value) -> Option<i64> {
    match value {
        Value::Integer(int) => Some(int),
        Value::Real(real) if real.is_finite() => Some(real as i64),
        Value::Text(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn decode_float(value: Value) -> Option<f64> {
    match value {
        Value::Real(real) => Some(real),
        Value::Integer(int) => Some(int as f64),
        Value::Text(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn decode_boolean(value: Value) -> Option<bool> {
    match value {
        Value::Integer(int) => Some(int != 0),
        Value::Real(real) => Some(real != 0.0),
        Value::Text(text) => parse_bool_text(&text),
        _ => None,
    }
}

fn parse_bool_text(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "t" | "y" | "yes" => Some(true),
        "0" | "false" | "f" | "n" | "no" => Some(false),
        _ => None,
    }
}

/// Decodes a timestamp cell from any of SQLite's three date storage
/// classes: TEXT, INTEGER Unix seconds, or REAL Julian day.
fn decode_timestamp(value: Value) -> Option<NaiveDateTime> {
    match value {
        Value::Text(text) => parse_timestamp_text(&text),
        Value::Integer(seconds) => datetime_from_unix_seconds(seconds),
        Value::Real(julian) => datetime_from_julian_day(julian),
        _ => None,
    }
}

fn decode_date(value: Value) -> Option<NaiveDate> {
    match value {
        Value::Text(text) => parse_date_text(&text),
        Value::Integer(seconds) => datetime_from_unix_seconds(seconds).map(|at| at.date()),
        Value::Real(julian) => datetime_from_julian_day(julian).map(|at| at.date()),
        _ => None,
    }
}

/// Parses timestamp text, falling back to a bare date at midnight.
pub fn parse_timestamp_text(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in TIMESTAMP_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, format) {
            return parsed.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Parses calendar-date text; timestamp text is accepted and truncated.
pub fn parse_date_text(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    for format in TIMESTAMP_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed.date());
        }
    }
    None
}

fn datetime_from_unix_seconds(seconds: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(seconds, 0).map(|instant| instant.naive_utc())
}

fn datetime_from_julian_day(value: f64) -> Option<NaiveDateTime> {
    if !value.is_finite() {
        return None;
    }
    let micros = ((value - UNIX_EPOCH_JULIAN_DAY) * SECONDS_PER_DAY * 1_000_000.0).round();
    if micros.abs() > 9.2e18 {
        return None;
    }
    rdp_model::datetime_from_epoch_micros(micros as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn datetime_decls_resolve_before_date() {
        assert_eq!(SourceType::from_decl(Some("DATETIME")), SourceType::Timestamp);
        assert_eq!(SourceType::from_decl(Some("timestamp")), SourceType::Timestamp);
        assert_eq!(SourceType::from_decl(Some("DATE")), SourceType::Date);
    }

    #[test]
    fn affinity_style_decl_matching() {
        assert_eq!(SourceType::from_decl(Some("INTEGER")), SourceType::Integer);
        assert_eq!(SourceType::from_decl(Some("BIGINT")), SourceType::Integer);
        assert_eq!(SourceType::from_decl(Some("VARCHAR(80)")), SourceType::Text);
        assert_eq!(SourceType::from_decl(Some("NVARCHAR(255)")), SourceType::Text);
        assert_eq!(SourceType::from_decl(Some("DOUBLE")), SourceType::Float);
        assert_eq!(SourceType::from_decl(Some("DECIMAL(10,2)")), SourceType::Float);
        assert_eq!(SourceType::from_decl(Some("BOOLEAN")), SourceType::Boolean);
    }

    #[test]
    fn undeclared_and_blob_fall_back_to_text() {
        assert_eq!(SourceType::from_decl(None), SourceType::Text);
        assert_eq!(SourceType::from_decl(Some("")), SourceType::Text);
        assert_eq!(SourceType::from_decl(Some("BLOB")), SourceType::Text);
    }

    #[test]
    fn timestamp_text_accepts_common_layouts() {
        let expected = date(1899, 1, 1).and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(parse_timestamp_text("1899-01-01 00:00:00"), Some(expected));
        assert_eq!(parse_timestamp_text("1899-01-01T00:00:00"), Some(expected));
        assert_eq!(parse_timestamp_text("1899-01-01"), Some(expected));
        assert_eq!(parse_timestamp_text("not a date"), None);
        assert_eq!(parse_timestamp_text(""), None);
    }

    #[test]
    fn date_text_truncates_timestamp_layouts() {
        assert_eq!(parse_date_text("2024-06-15"), Some(date(2024, 6, 15)));
        assert_eq!(parse_date_text("2024/06/15"), Some(date(2024, 6, 15)));
        assert_eq!(parse_date_text("15-Mar-2021"), Some(date(2021, 3, 15)));
        assert_eq!(
            parse_date_text("2024-06-15 13:45:30"),
            Some(date(2024, 6, 15))
        );
        assert_eq!(parse_date_text("junk"), None);
    }

    #[test]
    fn unix_seconds_and_julian_days_decode() {
        assert_eq!(
            datetime_from_unix_seconds(86_400),
            date(1970, 1, 2).and_hms_opt(0, 0, 0)
        );
        assert_eq!(
            datetime_from_julian_day(2_460_476.5),
            date(2024, 6, 15).and_hms_opt(0, 0, 0)
        );
        assert_eq!(datetime_from_julian_day(f64::NAN), None);
    }

    #[test]
    fn boolean_text_values_decode_leniently() {
        assert_eq!(parse_bool_text("yes"), Some(true));
        assert_eq!(parse_bool_text("F"), Some(false));
        assert_eq!(parse_bool_text("0"), Some(false));
        assert_eq!(parse_bool_text("maybe"), None);
    }

    #[test]
    fn buffers_materialize_with_declared_dtypes() {
        let mut buffer = ColumnBuffer::for_kind(SourceType::Timestamp);
        buffer.push(Value::Text("1899-01-01 00:00:00".to_string()));
        buffer.push(Value::Text("garbled".to_string()));
        buffer.push(Value::Null);

        let series = buffer.into_series("dob").unwrap();
        assert_eq!(
            series.dtype(),
            &DataType::Datetime(TimeUnit::Microseconds, None)
        );
        assert_eq!(series.len(), 3);
        assert_eq!(series.null_count(), 2);
    }

    #[test]
    fn malformed_numeric_text_becomes_missing() {
        let mut buffer = ColumnBuffer::for_kind(SourceType::Integer);
        buffer.push(Value::Text("42".to_string()));
        buffer.push(Value::Text("forty-two".to_string()));
        let series = buffer.into_series("count").unwrap();
        assert_eq!(series.dtype(), &DataType::Int64);
        assert_eq!(series.null_count(), 1);
    }
}
