//! End-to-end staging runs against real database files.

use std::path::PathBuf;

use polars::prelude::DataType;
use rusqlite::Connection;
use tempfile::TempDir;

use rdp_cli::plan::load_plan;
use rdp_cli::stage::{StageRequest, run_stage};
use rdp_model::{ImportPlan, TableSpec, Workspace};

fn registry_db(dir: &TempDir) -> PathBuf {
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
            INSERT INTO Demographics VALUES (1, '123-45-6789', 2, 11, '1985-03-09 13:30:00');
            INSERT INTO Demographics VALUES (2, '987-65-4321', 1, 7, '1899-01-01 00:00:00');
            INSERT INTO Demographics VALUES (3, NULL, 1, 2, NULL);
            CREATE TABLE [patient-visits] (
                visit_id INTEGER,
                centre_id INTEGER,
                patient_id INTEGER,
                visit_start DATETIME
            );
            INSERT INTO [patient-visits] VALUES (1, 1, 7, '2021-05-02 09:15:00');
            CREATE TABLE empty_labs (sample_id INTEGER, analyte TEXT);",
        )
        .unwrap();
    path
}

fn demographics_spec() -> TableSpec {
    TableSpec::new("Demographics".to_string())
        .with_excluded(vec!["ssn".to_string()])
        .with_order_by(vec!["centre_id".to_string(), "patient_id".to_string()])
}

fn request(database: PathBuf, plan: ImportPlan) -> StageRequest {
    StageRequest {
        database,
        plan,
        credential: None,
        drop_identifiers: false,
        normalize: true,
        sort_level: None,
    }
}

fn int_values(workspace: &Workspace, dataset: &str, column: &str) -> Vec<Option<i64>> {
    workspace
        .get(dataset)
        .unwrap()
        .data
        .column(column)
        .unwrap()
        .as_materialized_series()
        .i64()
        .unwrap()
        .into_iter()
        .collect()
}

#[test]
fn staging_projects_normalizes_and_stores_under_normalized_names() {
    let dir = TempDir::new().unwrap();
    let plan = ImportPlan::new(vec![
        demographics_spec(),
        TableSpec::new("patient-visits".to_string()),
    ]);
    let mut workspace = Workspace::new();

    run_stage(&request(registry_db(&dir), plan), &mut workspace).unwrap();

    assert_eq!(workspace.names(), vec!["Demographics", "patient_visits"]);

    let demographics = workspace.get("Demographics").unwrap();
    assert_eq!(
        demographics.column_names(),
        vec!["id", "centre_id", "patient_id", "dob"]
    );
    assert_eq!(
        int_values(&workspace, "Demographics", "id"),
        vec![Some(3), Some(2), Some(1)]
    );

    // Timestamps come out as dates; the 1899 sentinel is repaired to missing.
    let dob = workspace
        .get("Demographics")
        .unwrap()
        .data
        .column("dob")
        .unwrap()
        .clone();
    assert_eq!(dob.dtype(), &DataType::Date);
    assert_eq!(dob.null_count(), 2);

    let visits = workspace.get("patient_visits").unwrap();
    assert_eq!(visits.source_table.as_deref(), Some("patient-visits"));
    assert_eq!(
        visits.data.column("visit_start").unwrap().dtype(),
        &DataType::Date
    );
}

#[test]
fn identifier_columns_are_dropped_only_where_present() {
    let dir = TempDir::new().unwrap();
    let plan = ImportPlan::new(vec![
        TableSpec::new("Demographics".to_string()),
        TableSpec::new("patient-visits".to_string()),
    ]);
    let mut workspace = Workspace::new();
    let mut request = request(registry_db(&dir), plan);
    request.drop_identifiers = true;

    run_stage(&request, &mut workspace).unwrap();

    let demographics = workspace.get("Demographics").unwrap();
    assert_eq!(
        demographics.column_names(),
        vec!["id", "centre_id", "patient_id", "dob"]
    );
    // No identifier columns here, so the projection is untouched.
    assert_eq!(workspace.get("patient_visits").unwrap().column_count(), 4);
}

#[test]
fn grouping_level_orders_datasets_that_carry_the_keys() {
    let dir = TempDir::new().unwrap();
    let plan = ImportPlan::new(vec![
        demographics_spec().with_order_by(Vec::new()),
        TableSpec::new("empty_labs".to_string()),
    ]);
    let mut workspace = Workspace::new();
    let mut request = request(registry_db(&dir), plan);
    request.sort_level = Some("patient".to_string());

    run_stage(&request, &mut workspace).unwrap();

    // Demographics carries centre_id and patient_id, so it gets ordered.
    assert_eq!(
        int_values(&workspace, "Demographics", "id"),
        vec![Some(3), Some(2), Some(1)]
    );
    // empty_labs has neither key and is left as imported.
    assert_eq!(workspace.get("empty_labs").unwrap().record_count(), 0);
}

#[test]
fn unknown_grouping_level_fails_the_run() {
    let dir = TempDir::new().unwrap();
    let plan = ImportPlan::new(vec![demographics_spec()]);
    let mut workspace = Workspace::new();
    let mut request = request(registry_db(&dir), plan);
    request.sort_level = Some("episode".to_string());

    let error = run_stage(&request, &mut workspace).unwrap_err();

    assert!(error.to_string().contains("episode"));
}

#[test]
fn failed_import_keeps_earlier_datasets_and_releases_the_handle() {
    let dir = TempDir::new().unwrap();
    let database = registry_db(&dir);
    let plan = ImportPlan::new(vec![
        demographics_spec(),
        TableSpec::new("NoSuchTable".to_string()),
    ]);
    let mut workspace = Workspace::new();

    let error = run_stage(&request(database.clone(), plan), &mut workspace).unwrap_err();

    assert!(error.to_string().contains("import tables"));
    assert!(workspace.contains("Demographics"));
    assert!(!workspace.contains("NoSuchTable"));

    // The handle was released: the file opens again without contention.
    let plan = ImportPlan::new(vec![TableSpec::new("empty_labs".to_string())]);
    run_stage(&request(database, plan), &mut workspace).unwrap();
    assert!(workspace.contains("empty_labs"));
}

#[test]
fn staging_from_a_plan_file_matches_the_flag_path() {
    let dir = TempDir::new().unwrap();
    let database = registry_db(&dir);
    let plan_path = dir.path().join("refresh.toml");
    std::fs::write(
        &plan_path,
        r#"
description = "nightly refresh"

[[tables]]
table = "Demographics"
excluded_columns = ["ssn"]
order_by = ["centre_id", "patient_id"]
"#,
    )
    .unwrap();

    let plan = load_plan(&plan_path).unwrap();
    let mut workspace = Workspace::new();
    run_stage(&request(database, plan), &mut workspace).unwrap();

    assert_eq!(
        workspace.get("Demographics").unwrap().column_names(),
        vec!["id", "centre_id", "patient_id", "dob"]
    );
}
