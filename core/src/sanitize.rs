//! Identifier sanitizing.
//!
//! SQLite binds values, never identifiers. Any table or column name that
//! reaches a statement from outside the loaded schema passes through
//! [`sanitize_identifier`] first.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex must compile")
});

/// Rejected caller input, raised before any statement reaches the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Name does not match `^[A-Za-z_][A-Za-z0-9_]*$`.
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),
    /// An operation that needs at least one column was given none.
    #[error("column list cannot be empty")]
    EmptyColumnList,
}

/// Returns `true` if `identifier` is safe to interpolate into SQL text.
pub fn is_valid_identifier(identifier: &str) -> bool {
    IDENTIFIER_RE.is_match(identifier)
}

/// Passes `identifier` through unchanged if it is a plain SQL identifier.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidIdentifier`] for anything else,
/// including the empty string.
///
/// # Examples
///
/// ```
/// use ini_table_core::sanitize_identifier;
///
/// assert_eq!(sanitize_identifier("user_id").unwrap(), "user_id");
/// assert!(sanitize_identifier("id; DROP TABLE t").is_err());
/// ```
pub fn sanitize_identifier(identifier: &str) -> Result<&str, ValidationError> {
    if is_valid_identifier(identifier) {
        Ok(identifier)
    } else {
        Err(ValidationError::InvalidIdentifier(identifier.to_string()))
    }
}

/// Sanitizes every name in `identifiers`, failing on the first bad one.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyColumnList`] when `identifiers` is empty,
/// or the first [`ValidationError::InvalidIdentifier`].
pub fn sanitize_all<'a, S: AsRef<str>>(
    identifiers: &'a [S],
) -> Result<Vec<&'a str>, ValidationError> {
    if identifiers.is_empty() {
        return Err(ValidationError::EmptyColumnList);
    }
    identifiers
        .iter()
        .map(|name| sanitize_identifier(name.as_ref()))
        .collect()
}
