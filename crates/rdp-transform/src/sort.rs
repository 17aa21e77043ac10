//! Stable multi-key row ordering.

use std::cmp::Ordering;

use polars::prelude::{AnyValue, Column, DataFrame, IdxCa};

use rdp_model::SortSpec;

use crate::error::{Result, TransformError};

/// Returns a new frame with rows ordered by the spec's keys.
///
/// Keys are compared as typed values, most significant first, under one
/// direction flag for all keys. The sort is stable: rows comparing equal on
/// every key keep their input order, and a descending sort is the exact
/// reverse of the ascending one when no ties exist. Missing values order
/// before present values ascending; non-comparable pairs (NaN against a
/// number) are treated as equal. The input frame is never mutated, and an
/// empty key list returns an unchanged copy.
pub fn sort_rows(data: &DataFrame, spec: &SortSpec) -> Result<DataFrame> {
    let mut keys: Vec<&Column> = Vec::with_capacity(spec.keys.len());
    for name in &spec.keys {
        let column = data
            .column(name)
            .map_err(|_| TransformError::ColumnNotFound {
                column: name.clone(),
            })?;
        keys.push(column);
    }
    if keys.is_empty() {
        return Ok(data.clone());
    }

    let mut order: Vec<u32> = (0..data.height() as u32).collect();
    order.sort_by(|&left, &right| {
        let ordering = compare_rows(&keys, left as usize, right as usize);
        if spec.ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });

    let indices = IdxCa::from_vec("sort_order".into(), order);
    Ok(data.take(&indices)?)
}

/// Lexicographic comparison across the key columns.
fn compare_rows(keys: &[&Column], left: usize, right: usize) -> Ordering {
    for key in keys {
        let left_value = key.get(left).unwrap_or(AnyValue::Null);
        let right_value = key.get(right).unwrap_or(AnyValue::Null);
        let ordering = compare_values(&left_value, &right_value);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Missing-first total order over cell values.
fn compare_values(left: &AnyValue, right: &AnyValue) -> Ordering {
    match (matches!(left, AnyValue::Null), matches!(right, AnyValue::Null)) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => left.partial_cmp(right).unwrap_or(Ordering::Equal),
    }
}
