//! SQL text builders for the table operations.
//!
//! Every identifier interpolated here has already been sanitized or comes
//! from the loaded schema. Values are never interpolated: builders emit
//! `?N` placeholders and return the values to bind alongside. Caller
//! `WHERE` text is the one exception and is inserted verbatim (see
//! [`SqliteTable::select`](crate::SqliteTable::select)).

use ini_table_core::{ValidationError, Value, sanitize_all, sanitize_identifier};

/// Aggregate functions exposed by the table handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Min,
    Max,
    Avg,
}

impl Aggregate {
    /// SQL function name.
    pub fn function(self) -> &'static str {
        match self {
            Aggregate::Min => "MIN",
            Aggregate::Max => "MAX",
            Aggregate::Avg => "AVG",
        }
    }

    /// Word used in result messages.
    pub fn label(self) -> &'static str {
        match self {
            Aggregate::Min => "Minimum",
            Aggregate::Max => "Maximum",
            Aggregate::Avg => "Average",
        }
    }
}

/// A statement plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    fn without_params(sql: String) -> Self {
        Self {
            sql,
            params: Vec::new(),
        }
    }
}

fn where_suffix(where_clause: Option<&str>) -> String {
    match where_clause.map(str::trim) {
        Some(clause) if !clause.is_empty() => format!(" WHERE {clause}"),
        _ => String::new(),
    }
}

fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|n| format!("?{n}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `SELECT <cols> FROM <table> [WHERE <clause>]`.
///
/// A lone `*` entry selects every column; any other entry must be a plain
/// identifier.
pub fn select<S: AsRef<str>>(
    table: &str,
    columns: &[S],
    where_clause: Option<&str>,
) -> Result<Statement, ValidationError> {
    let projection = if columns.len() == 1 && columns[0].as_ref() == "*" {
        "*".to_string()
    } else {
        sanitize_all(columns)?.join(", ")
    };
    Ok(Statement::without_params(format!(
        "SELECT {projection} FROM {table}{}",
        where_suffix(where_clause)
    )))
}

/// `INSERT INTO <table> (<cols>) VALUES (?1, ...)`.
///
/// The placeholder count follows `values`, so a length mismatch is left for
/// the engine to reject.
pub fn insert<S: AsRef<str>>(
    table: &str,
    columns: &[S],
    values: &[Value],
) -> Result<Statement, ValidationError> {
    let columns = sanitize_all(columns)?;
    Ok(Statement {
        sql: format!(
            "INSERT INTO {table} ({}) VALUES ({})",
            columns.join(", "),
            placeholders(1, values.len())
        ),
        params: values.to_vec(),
    })
}

/// Merges single-column assignments; a later entry for the same column
/// overwrites the value but keeps the column's first position.
pub fn merge_assignments<S: AsRef<str>>(assignments: &[(S, Value)]) -> Vec<(&str, Value)> {
    let mut merged: Vec<(&str, Value)> = Vec::with_capacity(assignments.len());
    for (column, value) in assignments {
        let column = column.as_ref();
        match merged.iter_mut().find(|(name, _)| *name == column) {
            Some(slot) => slot.1 = value.clone(),
            None => merged.push((column, value.clone())),
        }
    }
    merged
}

/// `UPDATE <table> SET c1 = ?1, ... WHERE <clause>`.
pub fn update<S: AsRef<str>>(
    table: &str,
    assignments: &[(S, Value)],
    where_clause: &str,
) -> Result<Statement, ValidationError> {
    let merged = merge_assignments(assignments);
    if merged.is_empty() {
        return Err(ValidationError::EmptyColumnList);
    }

    let mut set_parts = Vec::with_capacity(merged.len());
    let mut params = Vec::with_capacity(merged.len());
    for (idx, (column, value)) in merged.into_iter().enumerate() {
        set_parts.push(format!("{} = ?{}", sanitize_identifier(column)?, idx + 1));
        params.push(value);
    }

    Ok(Statement {
        sql: format!(
            "UPDATE {table} SET {} WHERE {where_clause}",
            set_parts.join(", ")
        ),
        params,
    })
}

/// `DELETE FROM <table> WHERE <column> = ?1`.
pub fn delete(table: &str, column: &str, value: Value) -> Result<Statement, ValidationError> {
    let column = sanitize_identifier(column)?;
    Ok(Statement {
        sql: format!("DELETE FROM {table} WHERE {column} = ?1"),
        params: vec![value],
    })
}

/// `SELECT <AGG>(<column>) FROM <table>`.
pub fn aggregate(table: &str, func: Aggregate, column: &str) -> Result<Statement, ValidationError> {
    let column = sanitize_identifier(column)?;
    Ok(Statement::without_params(format!(
        "SELECT {}({column}) FROM {table}",
        func.function()
    )))
}

/// `SELECT COUNT(*) AS total FROM <table> [WHERE <clause>]`.
pub fn count(table: &str, where_clause: Option<&str>) -> Statement {
    Statement::without_params(format!(
        "SELECT COUNT(*) AS total FROM {table}{}",
        where_suffix(where_clause)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_sql() {
        let stmt = select("t", &["id", "name"], None).unwrap();
        assert_eq!(stmt.sql, "SELECT id, name FROM t");
        assert!(stmt.params.is_empty());

        let stmt = select("t", &["*"], Some("age > 30")).unwrap();
        assert_eq!(stmt.sql, "SELECT * FROM t WHERE age > 30");
    }

    #[test]
    fn test_select_blank_where_is_ignored() {
        let stmt = select("t", &["id"], Some("   ")).unwrap();
        assert_eq!(stmt.sql, "SELECT id FROM t");
    }

    #[test]
    fn test_select_rejects_bad_column() {
        assert!(select("t", &["id", "name; DROP TABLE t"], None).is_err());
        assert_eq!(
            select::<&str>("t", &[], None),
            Err(ValidationError::EmptyColumnList)
        );
        // `*` is only accepted on its own
        assert!(select("t", &["*", "id"], None).is_err());
    }

    #[test]
    fn test_insert_binds_values() {
        let stmt = insert("t", &["id", "name"], &[Value::Integer(1), Value::from("a")]).unwrap();
        assert_eq!(stmt.sql, "INSERT INTO t (id, name) VALUES (?1, ?2)");
        assert_eq!(stmt.params, vec![Value::Integer(1), Value::from("a")]);
    }

    #[test]
    fn test_merge_later_assignment_wins() {
        let assignments = [
            ("name", Value::from("first")),
            ("age", Value::Integer(3)),
            ("name", Value::from("second")),
        ];
        let merged = merge_assignments(&assignments);
        assert_eq!(
            merged,
            vec![("name", Value::from("second")), ("age", Value::Integer(3))]
        );
    }

    #[test]
    fn test_update_set_clause_uses_merged_values() {
        let stmt = update(
            "t",
            &[("name", Value::from("x")), ("name", Value::from("y"))],
            "id = 1",
        )
        .unwrap();
        assert_eq!(stmt.sql, "UPDATE t SET name = ?1 WHERE id = 1");
        assert_eq!(stmt.params, vec![Value::from("y")]);
    }

    #[test]
    fn test_update_rejects_empty_and_bad_columns() {
        assert_eq!(
            update::<&str>("t", &[], "id = 1"),
            Err(ValidationError::EmptyColumnList)
        );
        assert!(update("t", &[("bad col", Value::Null)], "id = 1").is_err());
    }

    #[test]
    fn test_delete_sql() {
        let stmt = delete("t", "id", Value::Integer(9)).unwrap();
        assert_eq!(stmt.sql, "DELETE FROM t WHERE id = ?1");
        assert_eq!(stmt.params, vec![Value::Integer(9)]);
        assert!(delete("t", "id = 1 OR 1", Value::Null).is_err());
    }

    #[test]
    fn test_aggregate_sql() {
        assert_eq!(
            aggregate("t", Aggregate::Avg, "age").unwrap().sql,
            "SELECT AVG(age) FROM t"
        );
        assert_eq!(Aggregate::Min.label(), "Minimum");
        assert!(aggregate("t", Aggregate::Max, "age)").is_err());
    }

    #[test]
    fn test_count_sql() {
        assert_eq!(count("t", None).sql, "SELECT COUNT(*) AS total FROM t");
        assert_eq!(
            count("t", Some("name = 'a'")).sql,
            "SELECT COUNT(*) AS total FROM t WHERE name = 'a'"
        );
    }
}
