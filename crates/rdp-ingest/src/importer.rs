//! Table import into the workspace.
//!
//! Each request is validated against the discovered schema, projected in
//! discovery order, fetched with the source-side ordering, and stored under
//! its normalized name. The first failure aborts the run; tables already
//! imported stay in the workspace. Partial imports are visible and never
//! rolled back.

use std::path::Path;
use std::time::Instant;

use tracing::{info, info_span, warn};

use rdp_model::{ImportPlan, TableFrame, TableSpec, Workspace};
use rdp_source::{Credential, DataSource, SourceColumn, SqliteSource};

use crate::error::{ImportError, Result};

/// Imports every spec in request order, aborting on the first failure.
pub fn import_tables<S: DataSource>(
    source: &S,
    specs: &[TableSpec],
    workspace: &mut Workspace,
) -> Result<()> {
    for spec in specs {
        import_table(source, spec, workspace)?;
    }
    Ok(())
}

/// Imports a single table according to its spec.
///
/// Steps: discover columns (order preserved), validate the requested
/// column names, project by set difference, fetch, store. A zero-row
/// result is a valid import; an empty projection is a configuration error
/// and leaves the workspace untouched for that table.
pub fn import_table<S: DataSource>(
    source: &S,
    spec: &TableSpec,
    workspace: &mut Workspace,
) -> Result<()> {
    let span = info_span!("import", table = %spec.table);
    let _guard = span.enter();
    let start = Instant::now();

    let discovered = source.list_columns(&spec.table)?;
    validate_requested_columns(spec, &discovered)?;

    let projection = project_columns(&discovered, &spec.excluded_columns);
    if projection.is_empty() {
        return Err(ImportError::EmptyProjection {
            table: spec.table.clone(),
        });
    }

    let data = source.fetch(&spec.table, &projection, &spec.order_by)?;
    let name = spec.normalized_name();
    let frame = TableFrame::new(name.clone(), data).with_source_table(spec.table.clone());
    let rows = frame.record_count();
    let columns = frame.column_count();
    if let Some(displaced) = workspace.insert(frame) {
        warn!(
            dataset = %displaced.name,
            rows = displaced.record_count(),
            "replaced existing dataset"
        );
    }
    info!(
        table = %spec.table,
        dataset = %name,
        rows,
        columns,
        duration_ms = start.elapsed().as_millis(),
        "table imported"
    );
    Ok(())
}

/// Imports the named tables with one exclusion list and one ordering list
/// applied uniformly, the historical calling convention for staging runs.
///
/// Every named table must carry the excluded and ordering columns;
/// per-table control lives in [`TableSpec`] and plan files. An empty table
/// list is rejected.
pub fn stage_tables<S: DataSource>(
    source: &S,
    tables: &[String],
    excluded: &[String],
    order_by: &[String],
    workspace: &mut Workspace,
) -> Result<()> {
    if tables.is_empty() {
        return Err(ImportError::EmptyPlan);
    }
    let specs: Vec<TableSpec> = tables
        .iter()
        .map(|table| {
            TableSpec::new(table.clone())
                .with_excluded(excluded.to_vec())
                .with_order_by(order_by.to_vec())
        })
        .collect();
    import_tables(source, &specs, workspace)
}

/// Imports every table the plan names, in plan order.
pub fn import_plan<S: DataSource>(
    source: &S,
    plan: &ImportPlan,
    workspace: &mut Workspace,
) -> Result<()> {
    if plan.is_empty() {
        return Err(ImportError::EmptyPlan);
    }
    import_tables(source, &plan.tables, workspace)
}

/// Opens a SQLite source, stages the tables, and releases the handle on
/// every path.
pub fn stage_from_path(
    path: &Path,
    credential: Option<&Credential>,
    tables: &[String],
    excluded: &[String],
    order_by: &[String],
    workspace: &mut Workspace,
) -> Result<()> {
    let start = Instant::now();
    let source = SqliteSource::open(path, credential)?;
    // An early return drops the source, which releases the handle.
    stage_tables(&source, tables, excluded, order_by, workspace)?;
    source.close()?;
    info!(
        tables = tables.len(),
        datasets = workspace.len(),
        duration_ms = start.elapsed().as_millis(),
        "staging complete"
    );
    Ok(())
}

/// Discovery order minus exclusions.
fn project_columns(discovered: &[SourceColumn], excluded: &[String]) -> Vec<SourceColumn> {
    discovered
        .iter()
        .filter(|column| !excluded.iter().any(|name| name == &column.name))
        .cloned()
        .collect()
}

/// Every excluded and ordering column must name a discovered column. The
/// check runs against the full schema, not the projection, so ordering by
/// an excluded column is allowed.
fn validate_requested_columns(spec: &TableSpec, discovered: &[SourceColumn]) -> Result<()> {
    for column in spec.excluded_columns.iter().chain(spec.order_by.iter()) {
        if !discovered.iter().any(|known| &known.name == column) {
            return Err(ImportError::UnknownColumn {
                table: spec.table.clone(),
                column: column.clone(),
            });
        }
    }
    Ok(())
}
