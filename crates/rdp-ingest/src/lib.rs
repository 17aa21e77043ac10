//! Table import into the staging workspace.
//!
//! The importer sits between the source layer and the workspace: it
//! validates each request against the discovered schema, builds an
//! order-preserving projection, and stores the fetched dataset under its
//! normalized name.

pub mod error;
pub mod importer;

pub use error::{ImportError, Result};
pub use importer::{import_plan, import_table, import_tables, stage_from_path, stage_tables};
