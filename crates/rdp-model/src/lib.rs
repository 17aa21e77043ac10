//! Core data model for the registry staging pipeline.
//!
//! This crate defines the request and container types shared by every stage:
//!
//! - **spec**: import requests (`TableSpec`, `ImportPlan`) and the in-memory
//!   ordering request (`SortSpec`)
//! - **frame**: the staged dataset container (`TableFrame`)
//! - **workspace**: the explicit name-to-dataset store (`Workspace`)
//! - **temporal**: physical time encodings shared by source and transform

pub mod frame;
pub mod spec;
pub mod temporal;
pub mod workspace;

pub use frame::TableFrame;
pub use spec::{ImportPlan, SortSpec, TableSpec, normalize_dataset_name};
pub use temporal::{
    date_from_epoch_days, datetime_from_epoch_micros, epoch_days_from_date,
    epoch_micros_from_datetime, raw_timestamp_to_micros,
};
pub use workspace::Workspace;
