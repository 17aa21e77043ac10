//! CLI argument definitions for Registry Data Prep.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "rdp",
    version,
    about = "Registry Data Prep - Stage registry extracts into typed datasets",
    long_about = "Stage tables from a registry extract into typed datasets.\n\n\
                  Imports SQLite extracts with schema-driven projections,\n\
                  truncates legacy timestamp columns to dates, and orders\n\
                  rows by the registry's grouping keys."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Stage tables into the workspace and print a per-dataset summary.
    Stage(StageArgs),

    /// List the tables a registry extract exposes.
    Tables(SourceArgs),

    /// Show one table's columns in discovery order with their mapped types.
    Columns(ColumnsArgs),

    /// Stage one table and print its first rows.
    Preview(PreviewArgs),

    /// List the registry grouping levels and their sort keys.
    Keys,
}

#[derive(Parser)]
pub struct StageArgs {
    /// Path to the registry extract (SQLite file).
    #[arg(value_name = "DATABASE")]
    pub database: PathBuf,

    /// Tables to stage, in import order.
    #[arg(value_name = "TABLE", required_unless_present = "plan")]
    pub tables: Vec<String>,

    /// Stage the tables named by a TOML plan file instead.
    #[arg(long = "plan", value_name = "FILE", conflicts_with = "tables")]
    pub plan: Option<PathBuf>,

    /// Column to leave behind in every staged table (repeatable).
    #[arg(long = "drop", value_name = "COLUMN")]
    pub drop: Vec<String>,

    /// Column the source must order rows by, applied to every table (repeatable).
    #[arg(long = "order-by", value_name = "COLUMN")]
    pub order_by: Vec<String>,

    /// Also drop the registry identifier columns where present.
    #[arg(long = "drop-identifiers")]
    pub drop_identifiers: bool,

    /// Order each staged dataset by a grouping level's keys.
    #[arg(long = "keys", value_name = "LEVEL")]
    pub keys: Option<String>,

    /// Skip timestamp-to-date normalization.
    #[arg(long = "no-normalize")]
    pub no_normalize: bool,

    /// Decryption credential for protected extracts.
    #[arg(long = "credential", value_name = "SECRET")]
    pub credential: Option<String>,
}

#[derive(Parser)]
pub struct SourceArgs {
    /// Path to the registry extract (SQLite file).
    #[arg(value_name = "DATABASE")]
    pub database: PathBuf,

    /// Decryption credential for protected extracts.
    #[arg(long = "credential", value_name = "SECRET")]
    pub credential: Option<String>,
}

#[derive(Parser)]
pub struct ColumnsArgs {
    /// Path to the registry extract (SQLite file).
    #[arg(value_name = "DATABASE")]
    pub database: PathBuf,

    /// Table to describe.
    #[arg(value_name = "TABLE")]
    pub table: String,

    /// Decryption credential for protected extracts.
    #[arg(long = "credential", value_name = "SECRET")]
    pub credential: Option<String>,
}

#[derive(Parser)]
pub struct PreviewArgs {
    /// Path to the registry extract (SQLite file).
    #[arg(value_name = "DATABASE")]
    pub database: PathBuf,

    /// Table to preview.
    #[arg(value_name = "TABLE")]
    pub table: String,

    /// Column to leave behind (repeatable).
    #[arg(long = "drop", value_name = "COLUMN")]
    pub drop: Vec<String>,

    /// Sort the preview by these columns (repeatable).
    #[arg(long = "sort-by", value_name = "COLUMN")]
    pub sort_by: Vec<String>,

    /// Sort in descending order.
    #[arg(long = "descending", requires = "sort_by")]
    pub descending: bool,

    /// Number of rows to print.
    #[arg(long = "limit", value_name = "N", default_value_t = 10)]
    pub limit: usize,

    /// Skip timestamp-to-date normalization.
    #[arg(long = "no-normalize")]
    pub no_normalize: bool,

    /// Decryption credential for protected extracts.
    #[arg(long = "credential", value_name = "SECRET")]
    pub credential: Option<String>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
