//! Staging pipeline shared by the CLI commands and integration tests.
//!
//! The pipeline opens the source, imports the planned tables into a
//! workspace, truncates timestamp columns to dates, and optionally orders
//! each dataset by a registry grouping level. The source handle is
//! released exactly once on every path, including import failures.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info, info_span, warn};

use rdp_ingest::import_plan;
use rdp_model::{ImportPlan, SortSpec, Workspace};
use rdp_source::{Credential, DataSource, SqliteSource};
use rdp_standards::{grouping_keys, identifier_columns, reference_epoch};
use rdp_transform::{EpochFloor, normalize_workspace, sort_rows};

/// One staging run: where to read from and what to do with the rows.
pub struct StageRequest {
    /// Path to the SQLite registry extract.
    pub database: PathBuf,
    /// Tables to import.
    pub plan: ImportPlan,
    /// Decryption credential for protected extracts.
    pub credential: Option<Credential>,
    /// Also exclude the registry identifier columns where a table has them.
    pub drop_identifiers: bool,
    /// Truncate timestamp columns to dates after import.
    pub normalize: bool,
    /// Order each dataset by this grouping level after normalization.
    pub sort_level: Option<String>,
}

/// Runs the full staging pipeline into the caller's workspace.
///
/// Tables imported before a failure stay in the workspace; nothing is
/// rolled back.
pub fn run_stage(request: &StageRequest, workspace: &mut Workspace) -> Result<()> {
    let span = info_span!("stage", database = %request.database.display());
    let _guard = span.enter();
    let start = Instant::now();

    // =========================================================================
    // Stage 1: Import - Open the source, pull the planned tables, close
    // =========================================================================
    let source = SqliteSource::open(&request.database, request.credential.as_ref())
        .context("open source")?;
    let imported = import_stage(&source, request, workspace);
    let closed = source.close();
    imported?;
    closed.context("close source")?;

    // =========================================================================
    // Stage 2: Normalize - Truncate timestamps, repair implausible dates
    // =========================================================================
    if request.normalize {
        normalize_workspace(workspace, &EpochFloor::new(reference_epoch()))
            .context("truncate timestamps")?;
    }

    // =========================================================================
    // Stage 3: Order - Sort each dataset by the requested grouping level
    // =========================================================================
    if let Some(level) = &request.sort_level {
        sort_stage(workspace, level)?;
    }

    info!(
        datasets = workspace.len(),
        duration_ms = start.elapsed().as_millis(),
        "staging complete"
    );
    Ok(())
}

fn import_stage<S: DataSource>(
    source: &S,
    request: &StageRequest,
    workspace: &mut Workspace,
) -> Result<()> {
    let plan = if request.drop_identifiers {
        with_identifier_drops(source, &request.plan)?
    } else {
        request.plan.clone()
    };
    if let Some(description) = &plan.description {
        info!(description = %description, "running import plan");
    }
    import_plan(source, &plan, workspace).context("import tables")?;
    Ok(())
}

/// Adds the registry identifier columns to each spec's exclusions, skipping
/// identifiers the table does not have.
fn with_identifier_drops<S: DataSource>(source: &S, plan: &ImportPlan) -> Result<ImportPlan> {
    let mut resolved = plan.clone();
    for spec in &mut resolved.tables {
        let discovered = source
            .list_columns(&spec.table)
            .with_context(|| format!("discover columns of '{}'", spec.table))?;
        for identifier in identifier_columns() {
            let present = discovered.iter().any(|column| column.name == *identifier);
            let excluded = spec.excluded_columns.iter().any(|name| name == identifier);
            if present && !excluded {
                debug!(table = %spec.table, column = identifier, "excluding identifier column");
                spec.excluded_columns.push((*identifier).to_string());
            }
        }
    }
    Ok(resolved)
}

/// Orders every dataset that carries the full key tuple; datasets missing a
/// key are left as imported.
fn sort_stage(workspace: &mut Workspace, level: &str) -> Result<()> {
    let keys = grouping_keys(level).ok_or_else(|| anyhow!("unknown grouping level '{level}'"))?;
    let sort = SortSpec::new(keys.iter().map(|key| (*key).to_string()).collect());
    for frame in workspace.iter_mut() {
        let names = frame.column_names();
        if let Some(missing) = sort.keys.iter().find(|key| !names.contains(*key)) {
            warn!(
                dataset = %frame.name,
                column = %missing,
                "sort key not present, dataset left unordered"
            );
            continue;
        }
        frame.data =
            sort_rows(&frame.data, &sort).with_context(|| format!("order '{}'", frame.name))?;
        debug!(dataset = %frame.name, keys = ?sort.keys, "dataset ordered");
    }
    Ok(())
}
