//! Error types for external source access.

use thiserror::Error;

/// Errors raised while talking to an external tabular source.
#[derive(Debug, Error)]
pub enum SourceError {
    // === Connection Errors ===
    /// The source could not be opened.
    #[error("failed to open source '{path}': {source}")]
    Connection {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    /// The handle could not be released cleanly.
    #[error("failed to close source: {source}")]
    Close {
        #[source]
        source: rusqlite::Error,
    },

    // === Schema Errors ===
    /// The named table does not exist in the source.
    #[error("unknown table '{table}'")]
    UnknownTable { table: String },

    // === Query Errors ===
    /// A query against the source failed.
    #[error("query against '{table}' failed: {source}")]
    Query {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Fetched rows could not be assembled into a dataset.
    #[error("failed to materialize dataset: {message}")]
    Materialize { message: String },
}

impl From<polars::prelude::PolarsError> for SourceError {
    fn from(error: polars::prelude::PolarsError) -> Self {
        SourceError::Materialize {
            message: error.to_string(),
        }
    }
}

/// Convenience alias for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_table_names_the_table() {
        let error = SourceError::UnknownTable {
            table: "Demographics".to_string(),
        };
        assert_eq!(error.to_string(), "unknown table 'Demographics'");
    }

    #[test]
    fn materialize_carries_the_message() {
        let error = SourceError::Materialize {
            message: "length mismatch".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "failed to materialize dataset: length mismatch"
        );
    }
}
