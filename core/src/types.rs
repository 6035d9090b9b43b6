//! Scalar values and result rows.
//!
//! A [`Row`] is an ordered mapping from column name to [`Value`], in the
//! column order the engine reported. Rows are produced by the query
//! executor; callers read them but never build them for writes.

use std::fmt;

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// A single SQL scalar.
///
/// Mirrors the storage classes SQLite hands back for this layer: text,
/// integer, real, and null.
///
/// # Examples
///
/// ```
/// use ini_table_core::Value;
///
/// assert_eq!(Value::from(7), Value::Integer(7));
/// assert_eq!(Value::from("bob"), Value::Text("bob".into()));
/// assert_eq!(Value::from(None::<i64>), Value::Null);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the integer payload, if any.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the numeric payload widened to `f64`.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Real(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text payload, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Renders the value as an inline SQL literal.
    ///
    /// Text is single-quoted with embedded quotes doubled. Statements built
    /// by this crate never execute these literals; they bind values
    /// positionally. The rendering exists for statement logging.
    ///
    /// ```
    /// use ini_table_core::Value;
    ///
    /// assert_eq!(Value::from("it's").to_sql_literal(), "'it''s'");
    /// assert_eq!(Value::Null.to_sql_literal(), "NULL");
    /// assert_eq!(Value::Real(1.5).to_sql_literal(), "1.5");
    /// ```
    pub fn to_sql_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Integer(v) => v.to_string(),
            Value::Real(v) => v.to_string(),
            Value::Text(v) => format!("'{}'", v.replace('\'', "''")),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Real(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// One result row: column names paired with values, in result-set order.
///
/// Serializes as a JSON object whose keys keep the column order.
///
/// # Examples
///
/// ```
/// use ini_table_core::{Row, Value};
///
/// let row: Row = vec![
///     ("id".to_string(), Value::Integer(1)),
///     ("name".to_string(), Value::from("a")),
/// ]
/// .into_iter()
/// .collect();
///
/// assert_eq!(row.get("name"), Some(&Value::from("a")));
/// assert_eq!(row.columns().collect::<Vec<_>>(), ["id", "name"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    entries: Vec<(String, Value)>,
}

impl Row {
    /// Looks up a value by column name.
    ///
    /// When a result set repeats a column name, the first occurrence wins.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Returns the value at a result-set position.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.entries.get(index).map(|(_, value)| value)
    }

    /// Column names in result-set order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Values in result-set order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the row, returning its `(column, value)` pairs.
    pub fn into_pairs(self) -> Vec<(String, Value)> {
        self.entries
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> Row {
        vec![
            ("id".to_string(), Value::Integer(1)),
            ("name".to_string(), Value::from("a")),
            ("score".to_string(), Value::Real(2.5)),
            ("note".to_string(), Value::Null),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from(3_i32), Value::Integer(3));
        assert_eq!(Value::from(true), Value::Integer(1));
        assert_eq!(Value::from(0.25), Value::Real(0.25));
        assert_eq!(Value::from(String::from("x")), Value::Text("x".into()));
        assert_eq!(Value::from(Some("y")), Value::Text("y".into()));
        assert!(Value::from(None::<String>).is_null());
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Integer(4).as_integer(), Some(4));
        assert_eq!(Value::Integer(4).as_real(), Some(4.0));
        assert_eq!(Value::from("t").as_text(), Some("t"));
        assert_eq!(Value::Null.as_integer(), None);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Integer(-2).to_string(), "-2");
        assert_eq!(Value::from("plain").to_string(), "plain");
    }

    #[test]
    fn test_sql_literal_escapes_quotes() {
        assert_eq!(Value::from("O'Brien").to_sql_literal(), "'O''Brien'");
        assert_eq!(Value::Integer(10).to_sql_literal(), "10");
    }

    #[test]
    fn test_row_lookup_and_order() {
        let row = sample_row();
        assert_eq!(row.len(), 4);
        assert_eq!(row.get("score"), Some(&Value::Real(2.5)));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.get_index(1), Some(&Value::from("a")));
        assert_eq!(
            row.columns().collect::<Vec<_>>(),
            ["id", "name", "score", "note"]
        );
    }

    #[test]
    fn test_row_serializes_as_ordered_object() {
        let json = serde_json::to_string(&sample_row()).unwrap();
        assert_eq!(json, r#"{"id":1,"name":"a","score":2.5,"note":null}"#);
    }
}
