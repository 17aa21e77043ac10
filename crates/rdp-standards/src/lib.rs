//! Built-in conventions of the registry data model.
//!
//! Staging pulls tables verbatim; the conventions here describe what the
//! downstream model expects of them: the earliest plausible event date,
//! the key sets that order each grouping level, and the direct
//! identifiers that must never leave the staging workspace.

pub mod registry;

pub use registry::{grouping_keys, grouping_levels, identifier_columns, reference_epoch};
