//! Import plan files.
//!
//! A plan is a TOML document naming the tables to stage, with optional
//! per-table exclusions and ordering:
//!
//! ```toml
//! description = "Quarterly registry refresh"
//!
//! [[tables]]
//! table = "Demographics"
//! excluded_columns = ["ssn"]
//! order_by = ["centre_id", "patient_id"]
//!
//! [[tables]]
//! table = "patient-visits"
//! ```

use std::path::Path;

use rdp_ingest::ImportError;
use rdp_model::ImportPlan;

/// Reads and parses a TOML import plan.
///
/// An unreadable or unparsable file is an [`ImportError::InvalidPlan`]; a
/// plan naming no tables is an [`ImportError::EmptyPlan`].
pub fn load_plan(path: &Path) -> Result<ImportPlan, ImportError> {
    let contents = std::fs::read_to_string(path).map_err(|error| ImportError::InvalidPlan {
        path: path.to_path_buf(),
        message: error.to_string(),
    })?;
    let plan: ImportPlan = toml::from_str(&contents).map_err(|error| ImportError::InvalidPlan {
        path: path.to_path_buf(),
        message: error.to_string(),
    })?;
    if plan.is_empty() {
        return Err(ImportError::EmptyPlan);
    }
    Ok(plan)
}
