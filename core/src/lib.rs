//! Engine-independent building blocks for INI-configured tables.
//!
//! This crate holds everything that can be decided without touching a
//! database:
//!
//! - [`load_section`] / [`parse_section`] — read one INI section as ordered
//!   `(key, type)` pairs.
//! - [`parse_table_config`] and [`TableSchema`] — turn those pairs into
//!   columns and a `CREATE TABLE IF NOT EXISTS` statement with a single
//!   composite primary-key clause.
//! - [`sanitize_identifier`] — the identifier check applied to every
//!   caller-supplied table or column name.
//! - [`Value`] and [`Row`] — the scalar and row shapes results come back in.
//!
//! # Example
//!
//! ```
//! use ini_table_core::*;
//!
//! let pairs = parse_section("[t]\n*id=INTEGER\nname=TEXT\n", "t").unwrap();
//! let schema = TableSchema::from_pairs(&pairs).unwrap();
//!
//! assert_eq!(
//!     schema.create_table_sql("t"),
//!     "CREATE TABLE IF NOT EXISTS t (id INTEGER, name TEXT, PRIMARY KEY (id))"
//! );
//! assert!(sanitize_identifier("name").is_ok());
//! ```

mod config;
mod sanitize;
mod schema;
mod types;

pub use config::{ConfigError, load_section, parse_section};
pub use sanitize::{ValidationError, is_valid_identifier, sanitize_all, sanitize_identifier};
pub use schema::{ColumnSpec, TableSchema, parse_table_config};
pub use types::{Row, Value};
