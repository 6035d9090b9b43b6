//! SQLite access layer for a single INI-configured table.
//!
//! A table is declared in an INI section, one key per column:
//!
//! ```ini
//! [people]
//! *id=INTEGER
//! name=TEXT
//! age=INTEGER
//! ```
//!
//! [`SqliteTable::open`] loads that section, opens `people.db`, and creates
//! the table if it is missing, with `*` columns folded into one composite
//! primary key. The handle then offers select, insert, update, delete,
//! min/max/avg, and count.
//!
//! # Architecture
//!
//! - **`statement`** — SQL text builders; identifiers sanitized, values bound
//! - **`query`** — the executor: one transaction per statement, rollback on error
//! - **`convert`** — [`Value`] ↔ rusqlite value mapping
//! - **`table`** — the [`SqliteTable`] handle and its options
//!
//! # Error policy
//!
//! Opening a table and sanitizing identifiers fail through [`SqliteError`].
//! Statement failures never do: they are rolled back, logged with
//! `tracing`, and reported through `success == false` on the returned
//! [`QueryResult`] or [`StatementOutcome`].
//!
//! # Quick start
//!
//! ```
//! use ini_table_sqlite::{SqliteTable, TableOptions, TableSchema, Value};
//!
//! let schema = TableSchema::from_pairs(&[("*id", "INTEGER"), ("name", "TEXT")]).unwrap();
//! let table = SqliteTable::with_schema("t", schema, TableOptions::new().in_memory(true)).unwrap();
//!
//! table.insert(&["id", "name"], &[Value::from(1), Value::from("a")]).unwrap();
//! let result = table.select(&["id", "name"], None).unwrap();
//! assert!(result.success);
//! assert_eq!(result.rows[0].get("name"), Some(&Value::from("a")));
//!
//! table.delete("id", 1).unwrap();
//! assert_eq!(table.count(None), 0);
//! ```

mod convert;
mod error;
pub mod query;
pub mod statement;
mod table;

pub use error::{Result, SqliteError};
pub use ini_table_core::{ConfigError, Row, TableSchema, ValidationError, Value};
pub use query::QueryResult;
pub use statement::Aggregate;
pub use table::{SqliteTable, StatementOutcome, TableOptions};
