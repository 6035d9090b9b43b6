//! Table schema translation and `CREATE TABLE` generation.
//!
//! The loaded config pairs become an ordered list of [`ColumnSpec`]s.
//! Declaration order is the column order, and every `*`-marked column joins
//! a single composite `PRIMARY KEY (...)` clause in that same order.

use std::collections::HashSet;
use std::path::Path;

use crate::config::{self, ConfigError, Result};

const PRIMARY_KEY_MARKER: char = '*';

/// One declared column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Column name with the primary-key marker removed.
    pub name: String,
    /// SQL type text, copied verbatim from the config value.
    pub sql_type: String,
    /// Whether the column is part of the composite primary key.
    pub is_primary_key: bool,
}

impl ColumnSpec {
    /// Splits a raw config key into a column, stripping the `*` marker.
    pub fn from_config_key(key: &str, sql_type: &str) -> Self {
        let key = key.trim();
        let (name, is_primary_key) = match key.strip_prefix(PRIMARY_KEY_MARKER) {
            Some(rest) => (rest.trim_start(), true),
            None => (key, false),
        };
        Self {
            name: name.to_string(),
            sql_type: sql_type.trim().to_string(),
            is_primary_key,
        }
    }

    /// The column definition as it appears in `CREATE TABLE`: `"<name> <type>"`.
    pub fn definition(&self) -> String {
        if self.sql_type.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.sql_type)
        }
    }
}

/// Translates raw config pairs into `(column definition, is primary key)`.
///
/// Pure and order-preserving; the input is the output of
/// [`load_section`](crate::load_section).
///
/// # Examples
///
/// ```
/// use ini_table_core::parse_table_config;
///
/// let defs = parse_table_config(&[("*id", "INTEGER"), ("name", "TEXT")]);
/// assert_eq!(
///     defs,
///     vec![("id INTEGER".to_string(), true), ("name TEXT".to_string(), false)]
/// );
/// ```
pub fn parse_table_config<K, V>(pairs: &[(K, V)]) -> Vec<(String, bool)>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    pairs
        .iter()
        .map(|(key, value)| {
            let column = ColumnSpec::from_config_key(key.as_ref(), value.as_ref());
            (column.definition(), column.is_primary_key)
        })
        .collect()
}

/// The full column layout of the managed table.
///
/// Built once when the table handle is opened and never altered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableSchema {
    columns: Vec<ColumnSpec>,
}

impl TableSchema {
    /// Loads the section named `table` from the INI file at `path`.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] from reading the file, plus
    /// [`ConfigError::DuplicateColumn`].
    pub fn load(path: impl AsRef<Path>, table: &str) -> Result<Self> {
        let pairs = config::load_section(path, table)?;
        Self::from_pairs(&pairs)
    }

    /// Builds a schema from raw `(key, type)` pairs, `*` markers included.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateColumn`] if two keys name the same
    /// column once the marker is stripped.
    ///
    /// # Examples
    ///
    /// ```
    /// use ini_table_core::TableSchema;
    ///
    /// let schema = TableSchema::from_pairs(&[("*id", "INTEGER"), ("name", "TEXT")]).unwrap();
    /// assert_eq!(schema.primary_key(), ["id"]);
    /// assert_eq!(
    ///     schema.create_table_sql("t"),
    ///     "CREATE TABLE IF NOT EXISTS t (id INTEGER, name TEXT, PRIMARY KEY (id))"
    /// );
    /// ```
    pub fn from_pairs<K, V>(pairs: &[(K, V)]) -> Result<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut columns = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            let column = ColumnSpec::from_config_key(key.as_ref(), value.as_ref());
            if !seen.insert(column.name.clone()) {
                return Err(ConfigError::DuplicateColumn(column.name));
            }
            columns.push(column);
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Primary-key column names in declaration order; empty when none are marked.
    pub fn primary_key(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.is_primary_key)
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Builds the idempotent creation statement for `table`.
    ///
    /// Column definitions keep declaration order. A `PRIMARY KEY (...)`
    /// clause is appended only when at least one column is marked.
    pub fn create_table_sql(&self, table: &str) -> String {
        let mut parts: Vec<String> = self.columns.iter().map(ColumnSpec::definition).collect();
        let primary_key = self.primary_key();
        if !primary_key.is_empty() {
            parts.push(format!("PRIMARY KEY ({})", primary_key.join(", ")));
        }
        format!("CREATE TABLE IF NOT EXISTS {table} ({})", parts.join(", "))
    }
}
