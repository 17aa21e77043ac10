//! Timestamp-to-date normalization across the workspace.

use polars::prelude::{DataFrame, DataType, NamedFrom, Series, TimeUnit};
use tracing::info;

use rdp_model::{
    TableFrame, Workspace, datetime_from_epoch_micros, epoch_days_from_date,
    raw_timestamp_to_micros,
};

use crate::error::Result;
use crate::repair::DateRepair;

/// Truncates every timestamp column in every dataset to date granularity,
/// passing each value through the repair hook.
///
/// Plain date and non-temporal columns are left untouched, which makes the
/// sweep idempotent: normalizing an already-normalized workspace changes
/// nothing. One notice is emitted per converted column.
pub fn normalize_workspace(workspace: &mut Workspace, repair: &dyn DateRepair) -> Result<()> {
    for frame in workspace.iter_mut() {
        normalize_frame(frame, repair)?;
    }
    Ok(())
}

/// Normalizes a single dataset in place.
pub fn normalize_frame(frame: &mut TableFrame, repair: &dyn DateRepair) -> Result<()> {
    let timestamp_columns: Vec<(String, TimeUnit)> = frame
        .data
        .get_columns()
        .iter()
        .filter_map(|column| match column.dtype() {
            DataType::Datetime(unit, _) => Some((column.name().to_string(), *unit)),
            _ => None,
        })
        .collect();

    for (name, unit) in timestamp_columns {
        let truncated = truncate_to_dates(&frame.data, &name, unit, repair)?;
        frame.data.with_column(truncated)?;
        info!(
            column = %name,
            dataset = %frame.name,
            "timestamp column truncated to date"
        );
    }
    Ok(())
}

/// Rebuilds one timestamp column as repaired calendar dates.
///
/// The raw values are read through their physical representation so any
/// source time unit is handled; the replacement keeps the column name and,
/// via `with_column`, its position.
fn truncate_to_dates(
    data: &DataFrame,
    name: &str,
    unit: TimeUnit,
    repair: &dyn DateRepair,
) -> Result<Series> {
    let physical = data
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Int64)?;
    let raw = physical.i64()?;

    let mut days: Vec<Option<i32>> = Vec::with_capacity(raw.len());
    for value in raw {
        let date = value.and_then(|raw_value| {
            let micros = raw_timestamp_to_micros(raw_value, unit);
            datetime_from_epoch_micros(micros).map(|instant| instant.date())
        });
        days.push(repair.repair(date).map(epoch_days_from_date));
    }

    Ok(Series::new(name.into(), days).cast(&DataType::Date)?)
}
