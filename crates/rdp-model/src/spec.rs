//! Import request types.
//!
//! A [`TableSpec`] describes one table pull: which source table to read,
//! which columns to leave behind, and how the source should order the rows.
//! An [`ImportPlan`] bundles specs for batch staging; [`SortSpec`] carries
//! the in-memory ordering request consumed by the row sorter.

use serde::{Deserialize, Serialize};

/// Request to import one table from an external source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    /// Table identifier exactly as the source knows it (may contain hyphens).
    pub table: String,
    /// Columns dropped from the projection.
    #[serde(default)]
    pub excluded_columns: Vec<String>,
    /// Columns for the source-side ORDER BY; empty means no ordering clause.
    #[serde(default)]
    pub order_by: Vec<String>,
}

impl TableSpec {
    pub fn new(table: String) -> Self {
        Self {
            table,
            excluded_columns: Vec::new(),
            order_by: Vec::new(),
        }
    }

    pub fn with_excluded(mut self, columns: Vec<String>) -> Self {
        self.excluded_columns = columns;
        self
    }

    pub fn with_order_by(mut self, columns: Vec<String>) -> Self {
        self.order_by = columns;
        self
    }

    /// Workspace key for the imported dataset.
    pub fn normalized_name(&self) -> String {
        normalize_dataset_name(&self.table)
    }
}

/// Maps a source table identifier to its workspace dataset name.
///
/// Hyphens are not valid identifiers in downstream tooling, so
/// `patient-visits` is stored as `patient_visits`. Names without hyphens
/// pass through unchanged; the mapping is deterministic.
pub fn normalize_dataset_name(table: &str) -> String {
    table.replace('-', "_")
}

/// A batch of table imports, typically loaded from a TOML plan file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportPlan {
    /// Free-text description shown in logs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Tables to import, in request order.
    #[serde(default)]
    pub tables: Vec<TableSpec>,
}

impl ImportPlan {
    pub fn new(tables: Vec<TableSpec>) -> Self {
        Self {
            description: None,
            tables,
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// In-memory ordering request: key columns plus one direction flag.
///
/// The flag applies to every key. Per-key direction is deliberately not
/// supported; callers that need mixed directions sort twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Key columns, most significant first.
    pub keys: Vec<String>,
    /// Direction applied to all keys.
    pub ascending: bool,
}

impl SortSpec {
    /// Ascending sort over the given keys.
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            keys,
            ascending: true,
        }
    }

    /// Flips the direction for all keys.
    pub fn descending(mut self) -> Self {
        self.ascending = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_hyphens_to_underscores() {
        assert_eq!(normalize_dataset_name("patient-visits"), "patient_visits");
        assert_eq!(normalize_dataset_name("lab-results-2024"), "lab_results_2024");
    }

    #[test]
    fn leaves_plain_names_unchanged() {
        assert_eq!(normalize_dataset_name("demographics"), "demographics");
        assert_eq!(normalize_dataset_name("already_flat"), "already_flat");
    }

    #[test]
    fn spec_builders_populate_fields() {
        let spec = TableSpec::new("patient-visits".to_string())
            .with_excluded(vec!["ssn".to_string()])
            .with_order_by(vec!["centre_id".to_string(), "patient_id".to_string()]);
        assert_eq!(spec.table, "patient-visits");
        assert_eq!(spec.excluded_columns, vec!["ssn"]);
        assert_eq!(spec.order_by, vec!["centre_id", "patient_id"]);
        assert_eq!(spec.normalized_name(), "patient_visits");
    }

    #[test]
    fn spec_round_trips_through_serde() {
        let spec = TableSpec::new("demographics".to_string())
            .with_excluded(vec!["ssn".to_string()])
            .with_order_by(vec!["centre_id".to_string()]);
        let json = serde_json::to_string(&spec).unwrap();
        let back: TableSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }

    #[test]
    fn spec_deserializes_with_missing_optional_lists() {
        let spec: TableSpec = serde_json::from_str(r#"{"table":"visits"}"#).unwrap();
        assert_eq!(spec.table, "visits");
        assert!(spec.excluded_columns.is_empty());
        assert!(spec.order_by.is_empty());
    }

    #[test]
    fn sort_spec_defaults_to_ascending() {
        let spec = SortSpec::new(vec!["centre_id".to_string()]);
        assert!(spec.ascending);
        assert!(!spec.clone().descending().ascending);
    }
}
