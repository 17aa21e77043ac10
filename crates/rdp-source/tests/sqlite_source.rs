//! Integration tests for the SQLite source against real database files.

use polars::prelude::{AnyValue, DataType, TimeUnit};
use rusqlite::Connection;
use tempfile::TempDir;

use rdp_source::{Credential, DataSource, SourceError, SourceType, SqliteSource};

fn registry_db(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("registry.db");
    let connection = Connection::open(&path).unwrap();
    connection
        .execute_batch(
            "CREATE TABLE Demographics (
                id INTEGER,
                ssn TEXT,
                centre_id INTEGER,
                patient_id INTEGER,
                dob DATETIME
            );
            INSERT INTO Demographics VALUES (1, '123-45-6789', 2, 11, '1985-03-09 00:00:00');
            INSERT INTO Demographics VALUES (2, '987-65-4321', 1, 7, '1899-01-01 00:00:00');
            INSERT INTO Demographics VALUES (3, NULL, 1, 2, 'not a date');
            CREATE TABLE [patient-visits] (
                visit_id INTEGER,
                patient_id INTEGER,
                visit_date DATE
            );
            CREATE TABLE empty_labs (sample_id INTEGER, analyte TEXT);",
        )
        .unwrap();
    path
}

fn open(dir: &TempDir) -> SqliteSource {
    SqliteSource::open(&registry_db(dir), None).unwrap()
}

#[test]
fn discovers_columns_in_declaration_order() {
    let dir = TempDir::new().unwrap();
    let source = open(&dir);

    let columns = source.list_columns("Demographics").unwrap();
    let names: Vec<&str> = columns.iter().map(|column| column.name.as_str()).collect();
    assert_eq!(names, vec!["id", "ssn", "centre_id", "patient_id", "dob"]);
    assert_eq!(columns[0].kind, SourceType::Integer);
    assert_eq!(columns[1].kind, SourceType::Text);
    assert_eq!(columns[4].kind, SourceType::Timestamp);
}

#[test]
fn unknown_table_is_a_schema_error() {
    let dir = TempDir::new().unwrap();
    let source = open(&dir);

    let error = source.list_columns("NoSuchTable").unwrap_err();
    assert!(matches!(error, SourceError::UnknownTable { table } if table == "NoSuchTable"));
}

#[test]
fn fetch_materializes_declared_types_and_missing_values() {
    let dir = TempDir::new().unwrap();
    let source = open(&dir);

    let columns = source.list_columns("Demographics").unwrap();
    let frame = source.fetch("Demographics", &columns, &[]).unwrap();

    assert_eq!(frame.height(), 3);
    assert_eq!(frame.column("id").unwrap().dtype(), &DataType::Int64);
    assert_eq!(frame.column("ssn").unwrap().dtype(), &DataType::String);
    assert_eq!(
        frame.column("dob").unwrap().dtype(),
        &DataType::Datetime(TimeUnit::Microseconds, None)
    );

    // Physical view: midnight timestamps in microseconds, malformed -> null.
    let dob = frame
        .column("dob")
        .unwrap()
        .as_materialized_series()
        .cast(&DataType::Int64)
        .unwrap();
    assert_eq!(
        dob.get(1).unwrap(),
        AnyValue::Int64(-2_240_524_800_000_000)
    );
    assert_eq!(dob.get(2).unwrap(), AnyValue::Null);

    let ssn = frame.column("ssn").unwrap();
    assert_eq!(ssn.get(2).unwrap(), AnyValue::Null);
}

#[test]
fn fetch_orders_rows_server_side() {
    let dir = TempDir::new().unwrap();
    let source = open(&dir);

    let columns = source.list_columns("Demographics").unwrap();
    let order_by = vec!["centre_id".to_string(), "patient_id".to_string()];
    let frame = source.fetch("Demographics", &columns, &order_by).unwrap();

    let ids: Vec<Option<i64>> = frame
        .column("id")
        .unwrap()
        .as_materialized_series()
        .i64()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(ids, vec![Some(3), Some(2), Some(1)]);
}

#[test]
fn zero_row_table_fetches_with_full_schema() {
    let dir = TempDir::new().unwrap();
    let source = open(&dir);

    let columns = source.list_columns("empty_labs").unwrap();
    let frame = source.fetch("empty_labs", &columns, &[]).unwrap();
    assert_eq!(frame.height(), 0);
    assert_eq!(frame.width(), 2);
    assert_eq!(frame.column("sample_id").unwrap().dtype(), &DataType::Int64);
    assert_eq!(frame.column("analyte").unwrap().dtype(), &DataType::String);
}

#[test]
fn hyphenated_table_names_are_queryable() {
    let dir = TempDir::new().unwrap();
    let source = open(&dir);

    let columns = source.list_columns("patient-visits").unwrap();
    assert_eq!(columns.len(), 3);
    let frame = source.fetch("patient-visits", &columns, &[]).unwrap();
    assert_eq!(frame.height(), 0);
}

#[test]
fn missing_file_is_a_connection_error() {
    let dir = TempDir::new().unwrap();
    let error = SqliteSource::open(&dir.path().join("absent.db"), None).unwrap_err();
    assert!(matches!(error, SourceError::Connection { .. }));
}

#[test]
fn credential_is_accepted_and_never_rendered() {
    let dir = TempDir::new().unwrap();
    let credential = Credential::new("s3cret".to_string());

    let rendered = format!("{credential:?}");
    assert!(rendered.contains("<redacted>"));
    assert!(!rendered.contains("s3cret"));

    // Stock SQLite ignores the key pragma; the open path must still work.
    let source = SqliteSource::open(&registry_db(&dir), Some(&credential)).unwrap();
    assert_eq!(source.list_columns("Demographics").unwrap().len(), 5);
    source.close().unwrap();
}

#[test]
fn lists_tables_in_name_order() {
    let dir = TempDir::new().unwrap();
    let source = open(&dir);

    let tables = source.list_tables().unwrap();
    assert_eq!(tables, vec!["Demographics", "empty_labs", "patient-visits"]);
}
