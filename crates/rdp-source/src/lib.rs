//! External source access for the staging pipeline.
//!
//! [`DataSource`] is the seam between the importer and a concrete backing
//! store: column discovery in schema declaration order, plus projection
//! execution that materializes typed datasets. The SQLite implementation is
//! the production path; tests supply in-memory fakes.

pub mod decode;
pub mod error;
pub mod query;
pub mod sqlite;

pub use decode::{ColumnBuffer, SourceType, parse_date_text, parse_timestamp_text};
pub use error::{Result, SourceError};
pub use query::build_select;
pub use sqlite::{Credential, SqliteSource};

use polars::prelude::DataFrame;

/// A discovered column: name and mapped type tag, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceColumn {
    pub name: String,
    pub kind: SourceType,
}

impl SourceColumn {
    pub fn new(name: String, kind: SourceType) -> Self {
        Self { name, kind }
    }
}

/// Read access to an external tabular source.
pub trait DataSource {
    /// Columns of the named table in schema declaration order.
    ///
    /// Fails with [`SourceError::UnknownTable`] when the source does not
    /// know the table.
    fn list_columns(&self, table: &str) -> Result<Vec<SourceColumn>>;

    /// Executes the projection and materializes a typed dataset.
    ///
    /// Column order in the result is the projection order. A zero-row
    /// result is valid and still carries the full typed schema.
    fn fetch(
        &self,
        table: &str,
        columns: &[SourceColumn],
        order_by: &[String],
    ) -> Result<DataFrame>;
}
