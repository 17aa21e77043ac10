//! SQLite-backed data source.

use std::fmt;
use std::path::{Path, PathBuf};

use polars::prelude::{Column, DataFrame};
use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info};

use crate::decode::{ColumnBuffer, SourceType};
use crate::error::{Result, SourceError};
use crate::query::build_select;
use crate::{DataSource, SourceColumn};

/// Secret used to unlock an encrypted source.
///
/// The wrapped value never reaches logs or error messages; `Debug` renders
/// a fixed placeholder instead of the secret.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: String) -> Self {
        Self(secret)
    }

    fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Open handle onto a SQLite database file.
///
/// The connection is opened read-only and is released exactly once: either
/// through [`SqliteSource::close`], which surfaces teardown errors, or by
/// `Drop` as the backstop on error paths.
#[derive(Debug)]
pub struct SqliteSource {
    connection: Connection,
    path: PathBuf,
}

impl SqliteSource {
    /// Opens an existing database file, applying the credential before
    /// first use.
    ///
    /// The credential travels via `PRAGMA key`: stock SQLite ignores the
    /// pragma, encrypted builds consume it. Either way the secret stays out
    /// of the logs.
    pub fn open(path: &Path, credential: Option<&Credential>) -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_NO_MUTEX
            | OpenFlags::SQLITE_OPEN_URI;
        let connection =
            Connection::open_with_flags(path, flags).map_err(|source| SourceError::Connection {
                path: path.display().to_string(),
                source,
            })?;
        if let Some(credential) = credential {
            connection
                .pragma_update(None, "key", credential.expose())
                .map_err(|source| SourceError::Connection {
                    path: path.display().to_string(),
                    source,
                })?;
        }
        info!(path = %path.display(), "source opened");
        Ok(Self {
            connection,
            path: path.to_path_buf(),
        })
    }

    /// Path of the backing database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Tables the source exposes, in name order.
    pub fn list_tables(&self) -> Result<Vec<String>> {
        let mut statement = self
            .connection
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .map_err(query_error("sqlite_master"))?;
        let names = statement
            .query_map([], |row| row.get::<_, String>(0))
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(query_error("sqlite_master"))?;
        Ok(names)
    }

    /// Releases the connection, surfacing teardown errors.
    pub fn close(self) -> Result<()> {
        let Self { connection, path } = self;
        connection
            .close()
            .map_err(|(_connection, source)| SourceError::Close { source })?;
        debug!(path = %path.display(), "source closed");
        Ok(())
    }
}

impl DataSource for SqliteSource {
    fn list_columns(&self, table: &str) -> Result<Vec<SourceColumn>> {
        let mut statement = self
            .connection
            .prepare("SELECT name, type FROM pragma_table_info(?1) ORDER BY cid")
            .map_err(query_error(table))?;
        let columns = statement
            .query_map([table], |row| {
                let name: String = row.get(0)?;
                let decl: Option<String> = row.get(1)?;
                Ok(SourceColumn::new(name, SourceType::from_decl(decl.as_deref())))
            })
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(query_error(table))?;
        // A SQLite table always has at least one column, so an empty
        // pragma result means the table does not exist.
        if columns.is_empty() {
            return Err(SourceError::UnknownTable {
                table: table.to_string(),
            });
        }
        debug!(table, column_count = columns.len(), "columns discovered");
        Ok(columns)
    }

    fn fetch(
        &self,
        table: &str,
        columns: &[SourceColumn],
        order_by: &[String],
    ) -> Result<DataFrame> {
        let names: Vec<String> = columns.iter().map(|column| column.name.clone()).collect();
        let sql = build_select(table, &names, order_by);
        debug!(table, sql = %sql, "executing projection");

        let mut statement = self.connection.prepare(&sql).map_err(query_error(table))?;
        let mut buffers: Vec<ColumnBuffer> = columns
            .iter()
            .map(|column| ColumnBuffer::for_kind(column.kind))
            .collect();

        let mut rows = statement.query([]).map_err(query_error(table))?;
        while let Some(row) = rows.next().map_err(query_error(table))? {
            for (index, buffer) in buffers.iter_mut().enumerate() {
                let value: Value = row.get(index).map_err(query_error(table))?;
                buffer.push(value);
            }
        }

        let mut materialized: Vec<Column> = Vec::with_capacity(buffers.len());
        for (column, buffer) in columns.iter().zip(buffers) {
            materialized.push(buffer.into_series(&column.name)?.into());
        }
        let frame = DataFrame::new(materialized)?;
        debug!(
            table,
            rows = frame.height(),
            columns = frame.width(),
            "table fetched"
        );
        Ok(frame)
    }
}

fn query_error(table: &str) -> impl FnOnce(rusqlite::Error) -> SourceError + '_ {
    move |source| SourceError::Query {
        table: table.to_string(),
        source,
    }
}
