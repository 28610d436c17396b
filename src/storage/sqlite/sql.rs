//! SQL construction with numbered parameters.

use crate::filters::QuerySpec;
use crate::storage::mapper::{ColumnDiff, ColumnValue, escape_html};
use rusqlite::ToSql;
use rusqlite::types::{ToSqlOutput, Value};

impl ToSql for ColumnValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Text(s) => ToSqlOutput::from(s.as_str()),
            Self::Integer(n) => ToSqlOutput::from(*n),
            Self::Null => ToSqlOutput::Owned(Value::Null),
        })
    }
}

/// Builds `column IN (?n, ?n+1, ...)` for `values`.
///
/// # Returns
///
/// A tuple containing:
/// - The clause string
/// - Vector of parameter values
/// - The next available parameter index
pub fn build_in_clause(column: &str, values: Vec<String>, start_param: usize) -> (String, Vec<String>, usize) {
    let placeholders: Vec<String> = (0..values.len())
        .map(|i| format!("?{}", start_param + i))
        .collect();
    let next = start_param + values.len();
    (format!("{column} IN ({})", placeholders.join(", ")), values, next)
}

/// Builds the WHERE clause for an item query.
///
/// Groups are joined with AND. Expects `items` aliased `i` and a
/// `LEFT JOIN status s`. Returns an empty clause for an empty query.
pub fn build_item_filter(query: &QuerySpec, start_param: usize) -> (String, Vec<String>, usize) {
    let mut clauses = Vec::new();
    let mut params = Vec::new();
    let mut next = start_param;

    if let Some(ids) = query.status_ids() {
        let values = ids.into_iter().map(|id| id.into_inner()).collect();
        let (clause, values, n) = build_in_clause("i.status_id", values, next);
        clauses.push(clause);
        params.extend(values);
        next = n;
    }
    if let Some(kinds) = query.status_kinds() {
        let values = kinds.iter().map(|k| k.as_str().to_string()).collect();
        let (clause, values, n) = build_in_clause("s.kind", values, next);
        clauses.push(clause);
        params.extend(values);
        next = n;
    }
    if let Some(names) = query.names() {
        let values = names.iter().map(|n| escape_html(n)).collect();
        let (clause, values, n) = build_in_clause("i.name", values, next);
        clauses.push(clause);
        params.extend(values);
        next = n;
    }

    (where_clause(&clauses), params, next)
}

/// Builds the WHERE clause for a status query; groups are joined with AND.
pub fn build_status_filter(query: &QuerySpec, start_param: usize) -> (String, Vec<String>, usize) {
    let mut clauses = Vec::new();
    let mut params = Vec::new();
    let mut next = start_param;

    if let Some(ids) = query.status_ids() {
        let values = ids.into_iter().map(|id| id.into_inner()).collect();
        let (clause, values, n) = build_in_clause("id", values, next);
        clauses.push(clause);
        params.extend(values);
        next = n;
    }
    if let Some(kinds) = query.status_kinds() {
        let values = kinds.iter().map(|k| k.as_str().to_string()).collect();
        let (clause, values, n) = build_in_clause("kind", values, next);
        clauses.push(clause);
        params.extend(values);
        next = n;
    }
    if let Some(names) = query.names() {
        let values = names.iter().map(|n| escape_html(n)).collect();
        let (clause, values, n) = build_in_clause("name", values, next);
        clauses.push(clause);
        params.extend(values);
        next = n;
    }

    (where_clause(&clauses), params, next)
}

fn where_clause(clauses: &[String]) -> String {
    if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    }
}

/// Builds a partial `UPDATE` touching only the columns in `diff`.
///
/// The key is bound as the last parameter.
pub fn build_update(table: &str, diff: &ColumnDiff, key_column: &str) -> (String, Vec<ColumnValue>) {
    let mut assignments = Vec::with_capacity(diff.len());
    let mut params = Vec::with_capacity(diff.len() + 1);
    for (i, (column, value)) in diff.iter().enumerate() {
        assignments.push(format!("{} = ?{}", column.as_str(), i + 1));
        params.push(value.clone());
    }
    let sql = format!(
        "UPDATE {table} SET {} WHERE {key_column} = ?{}",
        assignments.join(", "),
        diff.len() + 1
    );
    (sql, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::query;
    use crate::models::StatusKind;
    use crate::storage::mapper::Column;

    #[test]
    fn test_in_clause_numbering() {
        let (clause, params, next) =
            build_in_clause("kind", vec!["a".to_string(), "b".to_string()], 3);
        assert_eq!(clause, "kind IN (?3, ?4)");
        assert_eq!(params.len(), 2);
        assert_eq!(next, 5);
    }

    #[test]
    fn test_item_filter_uses_and() {
        let query = QuerySpec::build([
            query::with_status_kinds([StatusKind::Up]),
            query::with_status_ids(["s1"]),
        ])
        .unwrap();
        let (clause, params, next) = build_item_filter(&query, 1);
        assert_eq!(clause, " WHERE i.status_id IN (?1) AND s.kind IN (?2)");
        assert_eq!(params, vec!["s1".to_string(), "STATUS_KIND_UP".to_string()]);
        assert_eq!(next, 3);
    }

    #[test]
    fn test_empty_filter_has_no_where() {
        let (clause, params, _) = build_status_filter(&QuerySpec::all(), 1);
        assert!(clause.is_empty());
        assert!(params.is_empty());
    }

    #[test]
    fn test_names_are_matched_escaped() {
        let query = QuerySpec::build([query::with_names(["a&b"])]).unwrap();
        let (_, params, _) = build_status_filter(&query, 1);
        assert_eq!(params, vec!["a&amp;b".to_string()]);
    }

    #[test]
    fn test_partial_update() {
        let mut diff = ColumnDiff::default();
        diff.set(Column::Name, ColumnValue::Text("x".to_string()));
        diff.set(Column::Updated, ColumnValue::Integer(5));
        let (sql, params) = build_update("items", &diff, "id");
        assert_eq!(sql, "UPDATE items SET name = ?1, updated = ?2 WHERE id = ?3");
        assert_eq!(params.len(), 2);
    }
}
