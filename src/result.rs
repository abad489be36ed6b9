use crate::error::{PgShimError, Result};
use crate::rewrite::InsertTable;
use crate::types::{RawQueryResult, Row, SqlValue};

/// Projects an engine result into rows.
pub fn to_rows(raw: RawQueryResult) -> Vec<Row> {
    raw.into_rows()
}

/// Builds an exec result. The inserted id is not looked up until asked for.
pub fn to_exec_result(raw: RawQueryResult, insert: Option<InsertTable>) -> ExecResult {
    let rows_affected = raw.rows_affected;
    ExecResult {
        rows_affected,
        inserted: InsertedId {
            rows: raw.into_rows(),
            insert,
        },
    }
}

/// Outcome of a statement run for its side effects.
#[derive(Debug, Clone)]
pub struct ExecResult {
    pub rows_affected: u64,
    pub inserted: InsertedId,
}

impl ExecResult {
    /// Resolves the generated id of the inserted row.
    /// See [`InsertedId::resolve`].
    pub fn inserted_id(&self, column: Option<&str>) -> Result<&SqlValue> {
        self.inserted.resolve(column)
    }

    /// Rows returned by the statement, if it had a RETURNING clause.
    pub fn rows(&self) -> &[Row] {
        &self.inserted.rows
    }
}

/// Returned rows plus what the rewriter recorded about the INSERT target.
#[derive(Debug, Clone)]
pub struct InsertedId {
    rows: Vec<Row>,
    insert: Option<InsertTable>,
}

impl InsertedId {
    /// Picks the id column of the single returned row.
    ///
    /// Precedence: `column` if given, then the column named in the appended
    /// RETURNING clause, then `id`, `<table>_id` and `<TABLE>_ID`.
    pub fn resolve(&self, column: Option<&str>) -> Result<&SqlValue> {
        let row = match self.rows.as_slice() {
            [row] => row,
            rows => return Err(PgShimError::AmbiguousOrMissingRow { rows: rows.len() }),
        };

        let explicit = column.or_else(|| {
            self.insert
                .as_ref()
                .and_then(|insert| insert.id_column.as_deref())
        });
        if let Some(column) = explicit {
            return row.get(column).ok_or_else(|| PgShimError::UnknownColumn {
                column: column.to_string(),
                available: available(row),
            });
        }

        if let Some(insert) = &self.insert {
            let candidates = [
                "id".to_string(),
                format!("{}_id", insert.table.to_lowercase()),
                format!("{}_ID", insert.table.to_uppercase()),
            ];
            if let Some(value) = candidates.iter().find_map(|c| row.get(c)) {
                return Ok(value);
            }
        }

        Err(PgShimError::UnresolvedInsertedId {
            available: available(row),
        })
    }
}

fn available(row: &Row) -> String {
    row.columns().join(", ")
}
