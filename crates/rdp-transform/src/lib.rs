//! Workspace transforms: temporal normalization and row ordering.
//!
//! - **normalize**: truncate timestamp columns to date granularity across
//!   the workspace, with a pluggable repair hook for implausible values
//! - **sort**: stable multi-key row ordering over typed values
//! - **repair**: the correction seam applied during normalization

pub mod error;
pub mod normalize;
pub mod repair;
pub mod sort;

pub use error::{Result, TransformError};
pub use normalize::{normalize_frame, normalize_workspace};
pub use repair::{DateRepair, EpochFloor, KeepAll};
pub use sort::sort_rows;
