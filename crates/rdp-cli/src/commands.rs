use anyhow::{Context, Result, anyhow};

use rdp_cli::plan::load_plan;
use rdp_cli::stage::{StageRequest, run_stage};
use rdp_ingest::import_table;
use rdp_model::{ImportPlan, SortSpec, TableSpec, Workspace};
use rdp_source::{Credential, DataSource, SqliteSource};
use rdp_standards::{identifier_columns, reference_epoch};
use rdp_transform::{EpochFloor, normalize_frame, sort_rows};

use crate::cli::{ColumnsArgs, PreviewArgs, SourceArgs, StageArgs};
use crate::summary::{columns_table, frame_table, keys_table, tables_table};

pub fn run_stage_command(args: &StageArgs) -> Result<Workspace> {
    let plan = match &args.plan {
        Some(path) => load_plan(path).context("load import plan")?,
        None => {
            let tables = args
                .tables
                .iter()
                .map(|table| {
                    TableSpec::new(table.clone())
                        .with_excluded(args.drop.clone())
                        .with_order_by(args.order_by.clone())
                })
                .collect();
            ImportPlan::new(tables)
        }
    };
    let request = StageRequest {
        database: args.database.clone(),
        plan,
        credential: args.credential.clone().map(Credential::new),
        drop_identifiers: args.drop_identifiers,
        normalize: !args.no_normalize,
        sort_level: args.keys.clone(),
    };
    let mut workspace = Workspace::new();
    run_stage(&request, &mut workspace)?;
    Ok(workspace)
}

pub fn run_tables(args: &SourceArgs) -> Result<()> {
    let credential = args.credential.clone().map(Credential::new);
    let source = SqliteSource::open(&args.database, credential.as_ref()).context("open source")?;
    let listed = source.list_tables();
    let closed = source.close();
    let names = listed.context("list tables")?;
    closed.context("close source")?;
    println!("{}", tables_table(&names));
    Ok(())
}

pub fn run_columns(args: &ColumnsArgs) -> Result<()> {
    let credential = args.credential.clone().map(Credential::new);
    let source = SqliteSource::open(&args.database, credential.as_ref()).context("open source")?;
    let listed = source.list_columns(&args.table);
    let closed = source.close();
    let columns = listed.with_context(|| format!("describe table '{}'", args.table))?;
    closed.context("close source")?;
    println!("{}", columns_table(&columns));
    Ok(())
}

pub fn run_preview(args: &PreviewArgs) -> Result<()> {
    let credential = args.credential.clone().map(Credential::new);
    let source = SqliteSource::open(&args.database, credential.as_ref()).context("open source")?;
    let spec = TableSpec::new(args.table.clone()).with_excluded(args.drop.clone());
    let mut workspace = Workspace::new();
    let imported = import_table(&source, &spec, &mut workspace);
    let closed = source.close();
    imported.with_context(|| format!("import table '{}'", args.table))?;
    closed.context("close source")?;

    let name = spec.normalized_name();
    let frame = workspace
        .get_mut(&name)
        .ok_or_else(|| anyhow!("dataset '{name}' missing after import"))?;
    if !args.no_normalize {
        normalize_frame(frame, &EpochFloor::new(reference_epoch()))
            .context("truncate timestamps")?;
    }
    let mut data = frame.data.clone();
    if !args.sort_by.is_empty() {
        let mut sort = SortSpec::new(args.sort_by.clone());
        if args.descending {
            sort = sort.descending();
        }
        data = sort_rows(&data, &sort).context("order preview")?;
    }
    println!("{}", frame_table(&data, args.limit));
    println!("{} of {} rows", args.limit.min(data.height()), data.height());
    Ok(())
}

pub fn run_keys() {
    println!("{}", keys_table());
    println!(
        "Identifier columns dropped by --drop-identifiers: {}",
        identifier_columns().join(", ")
    );
}
