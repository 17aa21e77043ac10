//! CLI library components for Registry Data Prep.

pub mod logging;
pub mod plan;
pub mod stage;
