//! Staged dataset container.

use polars::prelude::DataFrame;

/// A staged dataset: the workspace name plus its typed rows.
///
/// The polars schema carries the per-column type tags assigned when the
/// source materialized the data; downstream stages dispatch on
/// [`DataType`](polars::prelude::DataType), never on formatted strings.
#[derive(Debug, Clone)]
pub struct TableFrame {
    /// Workspace name (hyphens already normalized to underscores).
    pub name: String,
    /// Typed rows in projection order.
    pub data: DataFrame,
    /// Source table identifier as the external source knows it.
    pub source_table: Option<String>,
}

impl TableFrame {
    pub fn new(name: String, data: DataFrame) -> Self {
        Self {
            name,
            data,
            source_table: None,
        }
    }

    pub fn with_source_table(mut self, table: String) -> Self {
        self.source_table = Some(table);
        self
    }

    /// Number of rows in the dataset.
    pub fn record_count(&self) -> usize {
        self.data.height()
    }

    /// Number of columns in the dataset.
    pub fn column_count(&self) -> usize {
        self.data.width()
    }

    /// Column names in dataset order.
    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_columns()
            .iter()
            .map(|column| column.name().to_string())
            .collect()
    }
}
