//! Conversion between [`Value`]/[`Row`] and rusqlite's value types.
//!
//! Blobs have no counterpart in [`Value`]; they come back as lossy UTF-8
//! text.

use ini_table_core::{Row, Value};
use rusqlite::types::{Value as SqlValue, ValueRef};

/// Converts a [`Value`] into an owned rusqlite value for binding.
pub(crate) fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(v) => SqlValue::Integer(*v),
        Value::Real(v) => SqlValue::Real(*v),
        Value::Text(v) => SqlValue::Text(v.clone()),
    }
}

/// Converts a borrowed column value from a result row.
pub(crate) fn from_value_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Integer(v),
        ValueRef::Real(v) => Value::Real(v),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Value::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

/// Maps one engine row to a [`Row`], pairing values with `columns` by position.
pub(crate) fn row_from_sqlite(row: &rusqlite::Row<'_>, columns: &[String]) -> rusqlite::Result<Row> {
    columns
        .iter()
        .enumerate()
        .map(|(idx, name)| Ok((name.clone(), from_value_ref(row.get_ref(idx)?))))
        .collect()
}

/// Renders bound parameters the way they would read inline, for logging.
pub(crate) fn render_params(params: &[Value]) -> String {
    let rendered: Vec<String> = params.iter().map(Value::to_sql_literal).collect();
    format!("[{}]", rendered.join(", "))
}
