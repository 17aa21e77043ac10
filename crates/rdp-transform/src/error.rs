//! Error types for workspace transforms.

use thiserror::Error;

/// Errors raised by the normalizer and the row sorter.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A sort key names a column the dataset does not have.
    #[error("dataset has no column '{column}'")]
    ColumnNotFound { column: String },

    /// A dataframe operation failed.
    #[error("dataframe operation failed: {message}")]
    Frame { message: String },
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(error: polars::prelude::PolarsError) -> Self {
        TransformError::Frame {
            message: error.to_string(),
        }
    }
}

/// Convenience alias for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;
