//! Error types for table import.

use std::path::PathBuf;

use thiserror::Error;

use rdp_source::SourceError;

/// Errors raised while importing tables into the workspace.
#[derive(Debug, Error)]
pub enum ImportError {
    // === Source Errors (passed through unchanged) ===
    #[error(transparent)]
    Source(#[from] SourceError),

    // === Configuration Errors ===
    /// An exclusion or ordering list names a column the table does not have.
    #[error("table '{table}' has no column '{column}'")]
    UnknownColumn { table: String, column: String },

    /// Every column of the table was excluded.
    #[error("projection for table '{table}' is empty after exclusions")]
    EmptyProjection { table: String },

    /// The import request named no tables.
    #[error("import request contains no tables")]
    EmptyPlan,

    /// A plan file could not be read or parsed.
    #[error("import plan {}: {message}", path.display())]
    InvalidPlan { path: PathBuf, message: String },
}

/// Convenience alias for import operations.
pub type Result<T> = std::result::Result<T, ImportError>;
