use std::sync::Arc;

use crate::types::SqlValue;

/// Driver-agnostic raw result from a database query.
#[derive(Debug, Clone)]
pub struct RawQueryResult {
    /// Column names in engine order
    pub columns: Vec<String>,
    /// Rows, where each row is a vector of values in column order
    pub rows: Vec<Vec<SqlValue>>,
    /// Row count reported by the engine (affected rows for DML)
    pub rows_affected: u64,
}

impl RawQueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<SqlValue>>, rows_affected: u64) -> Self {
        Self {
            columns,
            rows,
            rows_affected,
        }
    }

    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            rows_affected: 0,
        }
    }

    /// Projects the raw result into rows, sharing one column list between them.
    pub fn into_rows(self) -> Vec<Row> {
        let columns: Arc<[String]> = self.columns.into();
        self.rows
            .into_iter()
            .map(|values| Row::new(Arc::clone(&columns), values))
            .collect()
    }
}

/// A single result row.
/// Values keep the engine's column order and are accessed by column name.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<SqlValue>,
}

impl Row {
    pub(crate) fn new(columns: Arc<[String]>, values: Vec<SqlValue>) -> Self {
        Self { columns, values }
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Gets a value by column name.
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.position(column).and_then(|i| self.values.get(i))
    }

    /// Returns true if the row has a column with this exact name.
    pub fn contains(&self, column: &str) -> bool {
        self.position(column).is_some()
    }

    /// Returns all column names in engine order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Iterates over `(column, value)` pairs in engine order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.columns
            .iter()
            .map(|c| c.as_str())
            .zip(self.values.iter())
    }

    /// Returns the number of columns in this row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if this row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users_result() -> RawQueryResult {
        RawQueryResult::new(
            vec!["id".to_string(), "name".to_string()],
            vec![
                vec![SqlValue::Int32(1), SqlValue::from("John")],
                vec![SqlValue::Int32(2), SqlValue::Null],
            ],
            2,
        )
    }

    #[test]
    fn test_row_get() {
        let rows = users_result().into_rows();
        let row = &rows[0];

        assert_eq!(row.get("id"), Some(&SqlValue::Int32(1)));
        assert_eq!(row.get("name"), Some(&SqlValue::Text("John".to_string())));
        assert_eq!(row.get("missing"), None);
        assert!(row.contains("name"));
        assert!(!row.contains("Name"));
    }

    #[test]
    fn test_row_keeps_engine_column_order() {
        let raw = RawQueryResult::new(
            vec!["z".to_string(), "a".to_string(), "m".to_string()],
            vec![vec![
                SqlValue::Int32(1),
                SqlValue::Int32(2),
                SqlValue::Int32(3),
            ]],
            1,
        );
        let row = raw.into_rows().remove(0);
        let names: Vec<&str> = row.iter().map(|(c, _)| c).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn test_empty_result_has_no_rows() {
        assert!(RawQueryResult::empty().into_rows().is_empty());
    }
}
