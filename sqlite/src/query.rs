//! Statement execution with per-statement rollback.
//!
//! [`execute`] is the one place statements reach the engine. Each call runs
//! inside its own transaction: on success the transaction commits and the
//! rows come back as [`Row`]s; on failure it rolls back, the error is
//! logged, and the result reports `success == false` with no rows.

use ini_table_core::{Row, Value};
use rusqlite::{Connection, params_from_iter};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::convert;

/// Outcome of one executed statement.
///
/// Failed statements carry no rows and leave the table as it was before
/// the call.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct QueryResult {
    /// Result rows in engine order; empty for statements that return none.
    pub rows: Vec<Row>,
    /// `false` whenever the engine rejected the statement.
    pub success: bool,
    /// Engine error text for failed statements.
    pub error: Option<String>,
    /// Rows changed by an `INSERT`, `UPDATE`, or `DELETE`.
    pub rows_affected: u64,
}

impl QueryResult {
    fn succeeded(rows: Vec<Row>, rows_affected: u64) -> Self {
        Self {
            rows,
            success: true,
            error: None,
            rows_affected,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            rows: Vec::new(),
            success: false,
            error: Some(error),
            rows_affected: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// First column of the first row, if there is one.
    pub fn scalar(&self) -> Option<&Value> {
        self.first().and_then(|row| row.get_index(0))
    }
}

/// Runs `sql` with `params` bound positionally, committing on success and
/// rolling back on failure.
///
/// With `command_logging` the statement and its parameters are logged at
/// `info` before execution; otherwise at `debug`.
pub fn execute(conn: &Connection, sql: &str, params: &[Value], command_logging: bool) -> QueryResult {
    if command_logging {
        info!(sql, params = %convert::render_params(params), "executing statement");
    } else {
        debug!(sql, params = %convert::render_params(params), "executing statement");
    }

    match run(conn, sql, params) {
        Ok((rows, rows_affected)) => QueryResult::succeeded(rows, rows_affected),
        Err(e) => {
            error!(sql, error = %e, "statement failed, rolled back any changes");
            QueryResult::failed(e.to_string())
        }
    }
}

fn run(conn: &Connection, sql: &str, params: &[Value]) -> rusqlite::Result<(Vec<Row>, u64)> {
    // Dropping the transaction on an early return rolls it back.
    let tx = conn.unchecked_transaction()?;

    let (rows, rows_affected) = {
        let mut stmt = tx.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut result = stmt.query(params_from_iter(params.iter().map(convert::to_sql_value)))?;

        let mut rows = Vec::new();
        while let Some(row) = result.next()? {
            rows.push(convert::row_from_sqlite(row, &columns)?);
        }
        // `changes()` keeps the last DML count across DDL and PRAGMA statements.
        (rows, if is_row_change(sql) { tx.changes() } else { 0 })
    };

    tx.commit()?;
    Ok((rows, rows_affected))
}

/// Whether `sql` is an `INSERT`, `UPDATE`, `DELETE`, or `REPLACE`.
fn is_row_change(sql: &str) -> bool {
    let keyword = sql
        .trim_start()
        .split(|c: char| !c.is_ascii_alphabetic())
        .next()
        .unwrap_or_default();
    ["INSERT", "UPDATE", "DELETE", "REPLACE"]
        .iter()
        .any(|k| keyword.eq_ignore_ascii_case(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT);")
            .unwrap();
        conn
    }

    fn count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_execute_select_maps_rows() {
        let conn = setup();
        conn.execute("INSERT INTO t VALUES (1, 'a'), (2, NULL)", [])
            .unwrap();

        let result = execute(&conn, "SELECT id, name FROM t ORDER BY id", &[], false);
        assert!(result.success);
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0].get("name"), Some(&Value::from("a")));
        assert_eq!(result.rows[1].get("name"), Some(&Value::Null));
    }

    #[test]
    fn test_execute_binds_params_and_commits() {
        let conn = setup();
        let result = execute(
            &conn,
            "INSERT INTO t (id, name) VALUES (?1, ?2)",
            &[Value::Integer(7), Value::from("x")],
            true,
        );
        assert!(result.success);
        assert!(result.rows.is_empty());
        assert_eq!(result.rows_affected, 1);
        assert!(conn.is_autocommit(), "transaction should be closed");
        assert_eq!(count(&conn), 1);
    }

    #[test]
    fn test_execute_failure_rolls_back() {
        let conn = setup();
        conn.execute("INSERT INTO t VALUES (1, 'a')", []).unwrap();

        // The second row violates the primary key, so the whole statement fails.
        let result = execute(
            &conn,
            "INSERT INTO t (id, name) VALUES (2, 'b'), (1, 'dup')",
            &[],
            false,
        );
        assert!(!result.success);
        assert!(result.rows.is_empty());
        assert!(result.error.is_some());
        assert!(conn.is_autocommit());
        assert_eq!(count(&conn), 1);
    }

    #[test]
    fn test_execute_reports_syntax_errors() {
        let conn = setup();
        let result = execute(&conn, "SELEC nothing", &[], false);
        assert!(!result.success);
        assert!(result.error.unwrap().contains("syntax"));
    }

    #[test]
    fn test_execute_rejects_param_count_mismatch() {
        let conn = setup();
        let result = execute(
            &conn,
            "INSERT INTO t (id) VALUES (?1)",
            &[Value::Integer(1), Value::Integer(2)],
            false,
        );
        assert!(!result.success);
        assert_eq!(count(&conn), 0);
    }

    #[test]
    fn test_rows_affected_is_zero_for_ddl_after_update() {
        let conn = setup();
        conn.execute("INSERT INTO t VALUES (1, 'a'), (2, 'a')", [])
            .unwrap();

        let result = execute(&conn, "UPDATE t SET name = 'b'", &[], false);
        assert!(result.success);
        assert_eq!(result.rows_affected, 2);

        let result = execute(&conn, "CREATE INDEX idx_name ON t (name)", &[], false);
        assert!(result.success);
        assert_eq!(result.rows_affected, 0);

        let result = execute(&conn, "PRAGMA user_version = 3", &[], false);
        assert!(result.success);
        assert_eq!(result.rows_affected, 0);
    }

    #[test]
    fn test_is_row_change() {
        assert!(is_row_change("INSERT INTO t VALUES (1)"));
        assert!(is_row_change("  delete FROM t"));
        assert!(is_row_change("Update t SET name = 'x'"));
        assert!(!is_row_change("SELECT * FROM t"));
        assert!(!is_row_change("CREATE TABLE u (id INTEGER)"));
        assert!(!is_row_change(""));
    }

    #[test]
    fn test_scalar() {
        let conn = setup();
        let result = execute(&conn, "SELECT COUNT(*) AS total FROM t", &[], false);
        assert_eq!(result.scalar(), Some(&Value::Integer(0)));
    }
}
