//! Error types for table handle operations.
//!
//! Only opening, closing, and identifier sanitizing fail through these
//! types. Statement failures are rolled back and reported in the returned
//! [`QueryResult`](crate::QueryResult) or
//! [`StatementOutcome`](crate::StatementOutcome) instead.

use ini_table_core::{ConfigError, ValidationError};
use thiserror::Error;

/// Errors that abort a call to the table handle.
#[derive(Debug, Error)]
pub enum SqliteError {
    /// Loading the table definition failed.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// A caller-supplied identifier was rejected before reaching the engine.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Opening or closing the database file failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Convenience alias for results with [`SqliteError`].
pub type Result<T> = std::result::Result<T, SqliteError>;
