//! The single-table handle.
//!
//! [`SqliteTable`] owns one connection and one table. Opening it loads the
//! table's INI section, opens `<table>.db`, and issues
//! `CREATE TABLE IF NOT EXISTS`. Every operation afterwards goes through
//! [`query::execute`](crate::query::execute), so each call is its own
//! committed-or-rolled-back unit.
//!
//! # Trust boundary
//!
//! `WHERE` clauses passed to [`select`](SqliteTable::select),
//! [`update`](SqliteTable::update), and [`count`](SqliteTable::count) are
//! inserted into the statement verbatim. They are neither sanitized nor
//! bound. Never build them from untrusted input; use
//! [`delete`](SqliteTable::delete) or [`execute`](SqliteTable::execute) with
//! bound parameters for that.
//!
//! # Concurrency
//!
//! One connection, no locking. A handle is `Send` but not `Sync`; share it
//! across threads only behind an external mutex.
//!
//! # Example
//!
//! ```no_run
//! use ini_table_sqlite::{SqliteTable, Value};
//!
//! let table = SqliteTable::open("tables.ini", "people").unwrap();
//! table
//!     .insert(&["id", "name"], &[Value::from(1), Value::from("a")])
//!     .unwrap();
//! let result = table.select(&["id", "name"], None).unwrap();
//! assert_eq!(result.rows.len(), 1);
//! table.close().unwrap();
//! ```

use std::path::{Path, PathBuf};

use ini_table_core::{TableSchema, Value, sanitize_identifier};
use rusqlite::Connection;
use serde::Serialize;
use tracing::{error, info};

use crate::error::{Result, SqliteError};
use crate::query::{self, QueryResult};
use crate::statement::{self, Aggregate, Statement};

/// Where and how a table handle opens its database.
///
/// # Examples
///
/// ```
/// use ini_table_sqlite::TableOptions;
///
/// let options = TableOptions::new()
///     .database_dir("/var/lib/app")
///     .command_logging(true);
/// assert_eq!(
///     options.database_path("people"),
///     std::path::Path::new("/var/lib/app/people.db")
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct TableOptions {
    database_dir: Option<PathBuf>,
    in_memory: bool,
    command_logging: bool,
}

impl TableOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory holding `<table>.db`. Defaults to the working directory.
    pub fn database_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.database_dir = Some(dir.into());
        self
    }

    /// Use a private in-memory database instead of a file.
    pub fn in_memory(mut self, in_memory: bool) -> Self {
        self.in_memory = in_memory;
        self
    }

    /// Log every statement and its parameters at `info` level.
    pub fn command_logging(mut self, enabled: bool) -> Self {
        self.command_logging = enabled;
        self
    }

    /// The file a table named `table` lives in.
    pub fn database_path(&self, table: &str) -> PathBuf {
        let file = format!("{table}.db");
        match &self.database_dir {
            Some(dir) => dir.join(file),
            None => PathBuf::from(file),
        }
    }
}

/// Message-style result of a mutation or aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementOutcome {
    /// Human-readable description of what happened.
    pub message: String,
    pub success: bool,
    /// Rows changed; always 0 for aggregates and failures.
    pub rows_affected: u64,
}

impl StatementOutcome {
    fn from_result(result: &QueryResult, success_message: String, failure_prefix: &str) -> Self {
        if result.success {
            info!("{success_message}");
            Self {
                message: success_message,
                success: true,
                rows_affected: result.rows_affected,
            }
        } else {
            let error = result.error.as_deref().unwrap_or("unknown error");
            Self {
                message: format!("{failure_prefix} failed, rolled back. Error: {error}"),
                success: false,
                rows_affected: 0,
            }
        }
    }
}

/// Handle to one INI-configured table in its own SQLite file.
///
/// The connection is released when the handle is dropped or passed to
/// [`close`](Self::close).
#[derive(Debug)]
pub struct SqliteTable {
    conn: Connection,
    table: String,
    schema: TableSchema,
    command_logging: bool,
}

impl SqliteTable {
    /// Opens `<table>.db` in the working directory, using section `[table]`
    /// of `config_path` as the schema.
    ///
    /// # Errors
    ///
    /// - [`SqliteError::Validation`] if `table` is not a plain identifier.
    /// - [`SqliteError::Config`] if the file or section cannot be loaded.
    /// - [`SqliteError::Database`] if the database file cannot be opened.
    ///
    /// A failing `CREATE TABLE` is logged, not returned.
    pub fn open(config_path: impl AsRef<Path>, table: &str) -> Result<Self> {
        Self::open_with(config_path, table, TableOptions::default())
    }

    /// Like [`open`](Self::open), with explicit [`TableOptions`].
    pub fn open_with(
        config_path: impl AsRef<Path>,
        table: &str,
        options: TableOptions,
    ) -> Result<Self> {
        let table = sanitize_identifier(table)?;
        let schema = TableSchema::load(config_path, table)?;
        Self::with_schema(table, schema, options)
    }

    /// Opens a table whose schema was built in code rather than read from INI.
    ///
    /// # Errors
    ///
    /// Same as [`open`](Self::open), minus config loading.
    pub fn with_schema(table: &str, schema: TableSchema, options: TableOptions) -> Result<Self> {
        let table = sanitize_identifier(table)?.to_string();
        let conn = if options.in_memory {
            Connection::open_in_memory()?
        } else {
            Connection::open(options.database_path(&table))?
        };

        let handle = Self {
            conn,
            table,
            schema,
            command_logging: options.command_logging,
        };
        handle.create_table();
        Ok(handle)
    }

    /// Issues the idempotent creation statement, logging and swallowing any
    /// failure so that pre-existing tables stay usable.
    fn create_table(&self) -> bool {
        let sql = self.create_statement();
        if self.command_logging {
            info!(sql = %sql, "creating table");
        }
        match self.conn.execute(&sql, []) {
            Ok(_) => true,
            Err(e) => {
                error!(
                    phase = "create_table",
                    table = %self.table,
                    sql = %sql,
                    error = %e,
                    "table creation failed; continuing with the existing database"
                );
                false
            }
        }
    }

    /// The `CREATE TABLE IF NOT EXISTS` statement derived from the schema.
    pub fn create_statement(&self) -> String {
        self.schema.create_table_sql(&self.table)
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Consumes the handle and returns the underlying connection.
    pub fn into_connection(self) -> Connection {
        self.conn
    }

    /// Closes the connection, reporting any error from the engine.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| SqliteError::Database(e))
    }

    /// Runs an arbitrary statement with positional parameters.
    ///
    /// Never fails: engine errors are rolled back and reported in the
    /// returned [`QueryResult`].
    pub fn execute(&self, sql: &str, params: &[Value]) -> QueryResult {
        query::execute(&self.conn, sql, params, self.command_logging)
    }

    fn run(&self, statement: &Statement) -> QueryResult {
        self.execute(&statement.sql, &statement.params)
    }

    /// Selects `columns` from rows matching `where_clause`.
    ///
    /// Pass `&["*"]` for every column. `where_clause` is raw SQL without the
    /// `WHERE` keyword, trusted as-is (see the module docs).
    ///
    /// # Errors
    ///
    /// [`SqliteError::Validation`] for an empty or invalid column list.
    pub fn select<S: AsRef<str>>(
        &self,
        columns: &[S],
        where_clause: Option<&str>,
    ) -> Result<QueryResult> {
        let statement = statement::select(&self.table, columns, where_clause)?;
        Ok(self.run(&statement))
    }

    /// Inserts one row, binding `values` positionally against `columns`.
    ///
    /// # Errors
    ///
    /// [`SqliteError::Validation`] for an empty or invalid column list.
    pub fn insert<S: AsRef<str>>(&self, columns: &[S], values: &[Value]) -> Result<StatementOutcome> {
        let statement = statement::insert(&self.table, columns, values)?;
        let result = self.run(&statement);
        Ok(StatementOutcome::from_result(
            &result,
            "Data inserted successfully.".to_string(),
            "Insertion",
        ))
    }

    /// Deletes every row whose `column` equals `value`.
    ///
    /// # Errors
    ///
    /// [`SqliteError::Validation`] if `column` is not a plain identifier.
    pub fn delete(&self, column: &str, value: impl Into<Value>) -> Result<StatementOutcome> {
        let statement = statement::delete(&self.table, column, value.into())?;
        let result = self.run(&statement);
        Ok(StatementOutcome::from_result(
            &result,
            "Data deleted successfully.".to_string(),
            "Deletion",
        ))
    }

    /// Updates rows matching `where_clause`.
    ///
    /// `assignments` is a list of single-column assignments; when a column
    /// appears more than once, the last value wins. `where_clause` is
    /// trusted raw SQL (see the module docs).
    ///
    /// # Errors
    ///
    /// [`SqliteError::Validation`] for an empty or invalid assignment list.
    pub fn update<S: AsRef<str>>(
        &self,
        assignments: &[(S, Value)],
        where_clause: &str,
    ) -> Result<StatementOutcome> {
        let statement = statement::update(&self.table, assignments, where_clause)?;
        let result = self.run(&statement);
        Ok(StatementOutcome::from_result(
            &result,
            "Data updated successfully.".to_string(),
            "Update",
        ))
    }

    /// Runs `SELECT <func>(column)` and describes the result in a message
    /// such as `"Minimum from age: 30."`.
    ///
    /// # Errors
    ///
    /// [`SqliteError::Validation`] if `column` is not a plain identifier.
    pub fn aggregate(&self, func: Aggregate, column: &str) -> Result<StatementOutcome> {
        let statement = statement::aggregate(&self.table, func, column)?;
        let result = self.run(&statement);
        let value = result.scalar().cloned().unwrap_or_default();
        Ok(StatementOutcome::from_result(
            &result,
            format!("{} from {column}: {value}.", func.label()),
            "Selection",
        ))
    }

    pub fn select_min(&self, column: &str) -> Result<StatementOutcome> {
        self.aggregate(Aggregate::Min, column)
    }

    pub fn select_max(&self, column: &str) -> Result<StatementOutcome> {
        self.aggregate(Aggregate::Max, column)
    }

    pub fn select_avg(&self, column: &str) -> Result<StatementOutcome> {
        self.aggregate(Aggregate::Avg, column)
    }

    /// Counts rows matching the optional raw `where_clause`.
    ///
    /// Returns 0 when the statement fails.
    pub fn count(&self, where_clause: Option<&str>) -> i64 {
        let result = self.run(&statement::count(&self.table, where_clause));
        result.scalar().and_then(Value::as_integer).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_table(pairs: &[(&str, &str)]) -> SqliteTable {
        let schema = TableSchema::from_pairs(pairs).unwrap();
        SqliteTable::with_schema("t", schema, TableOptions::new().in_memory(true)).unwrap()
    }

    #[test]
    fn test_database_path_defaults_to_working_directory() {
        assert_eq!(TableOptions::new().database_path("t"), PathBuf::from("t.db"));
    }

    #[test]
    fn test_with_schema_creates_table() {
        let table = memory_table(&[("*id", "INTEGER"), ("name", "TEXT")]);
        let exists: i64 = table
            .connection()
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 't'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(exists, 1);
        assert_eq!(table.table_name(), "t");
        assert_eq!(table.schema().primary_key(), ["id"]);
    }

    #[test]
    fn test_invalid_table_name_rejected() {
        let err = SqliteTable::with_schema(
            "t; DROP TABLE x",
            TableSchema::default(),
            TableOptions::new().in_memory(true),
        )
        .unwrap_err();
        assert!(matches!(err, SqliteError::Validation(_)));
    }

    #[test]
    fn test_bad_schema_does_not_fail_open() {
        let table = memory_table(&[]);
        assert!(!table.create_table());
        assert_eq!(table.count(None), 0);
        assert!(!table.select(&["*"], None).unwrap().success);
    }

    #[test]
    fn test_outcome_messages() {
        let table = memory_table(&[("*id", "INTEGER"), ("age", "INTEGER")]);
        let ok = table
            .insert(&["id", "age"], &[Value::from(1), Value::from(40)])
            .unwrap();
        assert_eq!(ok.message, "Data inserted successfully.");
        assert_eq!(ok.rows_affected, 1);

        let dup = table
            .insert(&["id", "age"], &[Value::from(1), Value::from(41)])
            .unwrap();
        assert!(!dup.success);
        assert!(
            dup.message.starts_with("Insertion failed, rolled back. Error: "),
            "{}",
            dup.message
        );

        let max = table.select_max("age").unwrap();
        assert_eq!(max.message, "Maximum from age: 40.");
    }
}
