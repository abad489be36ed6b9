use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::connection::Connection;
use crate::cursor::Cursor;
use crate::error::{PgShimError, Result};
use crate::result::{self, ExecResult};
use crate::types::{ParamKey, Params, Row, SqlValue, MAX_PARAMETERS};

/// Identifies a prepared statement within one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatementId(u64);

impl StatementId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for StatementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pgshim_{}", self.0)
    }
}

/// Hands out increasing statement ids for a single connection.
#[derive(Debug, Default)]
pub struct StatementIds {
    next: AtomicU64,
}

impl StatementIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> StatementId {
        StatementId(self.next.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

/// A reusable statement with parameters that persist between runs.
///
/// Every run re-applies the INSERT rewriter to the original SQL and merges
/// the bound parameters with the call-site ones, the latter winning on
/// matching positions.
pub struct PreparedStatement<'c> {
    connection: &'c Connection,
    id: StatementId,
    sql: String,
    bound: Option<Params>,
}

impl<'c> PreparedStatement<'c> {
    pub(crate) fn new(connection: &'c Connection, sql: String, bound: Option<Params>) -> Self {
        let id = connection.next_statement_id();
        tracing::trace!(statement = %id, "prepared statement created");
        Self {
            connection,
            id,
            sql,
            bound,
        }
    }

    pub fn id(&self) -> StatementId {
        self.id
    }

    /// The SQL as given to `prepare`, before any rewriting.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn bound_params(&self) -> Option<&Params> {
        self.bound.as_ref()
    }

    /// Binds `value` at a 1-based position. Named keys are rejected.
    pub fn bind(
        &mut self,
        key: impl Into<ParamKey>,
        value: impl Into<SqlValue>,
    ) -> Result<&mut Self> {
        let index = match key.into() {
            ParamKey::Position(position) => slot(position.saturating_sub(1), position)?,
            ParamKey::Name(name) => {
                return Err(PgShimError::NotImplemented(format!(
                    "binding named parameter {name:?}; bind by position instead"
                )))
            }
        };

        let values = match self.bound.get_or_insert_with(|| Params::Positional(Vec::new())) {
            Params::Positional(values) => values,
            Params::Named(_) => {
                return Err(PgShimError::StyleMismatch {
                    base: "named",
                    overrides: "positional",
                })
            }
        };
        if values.len() <= index {
            values.resize(index + 1, None);
        }
        values[index] = Some(value.into());
        Ok(self)
    }

    /// Clears a bound slot.
    ///
    /// Unlike [`bind`](Self::bind), a numeric key here is the 0-based slot
    /// index. Does nothing when no parameters are bound or the key's style
    /// differs from the bound set.
    pub fn unbind(&mut self, key: impl Into<ParamKey>) -> Result<&mut Self> {
        match (&mut self.bound, key.into()) {
            (Some(Params::Positional(values)), ParamKey::Position(index)) => {
                let index = slot(index, index)?;
                if values.len() <= index {
                    values.resize(index + 1, None);
                }
                values[index] = None;
            }
            (Some(Params::Named(values)), ParamKey::Name(name)) => {
                values.remove(&name);
            }
            _ => {}
        }
        Ok(self)
    }

    fn merged(&self, params: Option<Params>) -> Result<Option<Params>> {
        Params::merge(self.bound.as_ref(), params.as_ref())
    }

    pub async fn exec(&self, params: Option<Params>) -> Result<ExecResult> {
        let params = self.merged(params)?;
        let (raw, insert) = self
            .connection
            .dispatch(&self.sql, params, Some(self.id))
            .await?;
        Ok(result::to_exec_result(raw, insert))
    }

    pub async fn all(&self, params: Option<Params>) -> Result<Vec<Row>> {
        let params = self.merged(params)?;
        let (raw, _) = self
            .connection
            .dispatch(&self.sql, params, Some(self.id))
            .await?;
        Ok(result::to_rows(raw))
    }

    /// Runs the statement and buffers the rows behind a [`Cursor`].
    /// Requires `in_memory_cursor` on the connection.
    pub async fn cursor(&self, params: Option<Params>) -> Result<Cursor> {
        self.connection.ensure_cursor_enabled()?;
        Ok(Cursor::new(self.all(params).await?))
    }

    /// Nothing is deallocated on the engine side; the driver may keep the
    /// parsed statement until the session ends.
    pub fn close(self) {
        tracing::trace!(statement = %self.id, "prepared statement closed");
    }
}

impl fmt::Debug for PreparedStatement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedStatement")
            .field("id", &self.id)
            .field("sql", &self.sql)
            .field("bound", &self.bound)
            .finish_non_exhaustive()
    }
}

/// Checks a 0-based slot against the engine's parameter limit. `key` is the
/// index as the caller gave it, for the error.
fn slot(index: i64, key: i64) -> Result<usize> {
    usize::try_from(index)
        .ok()
        .filter(|&index| index < MAX_PARAMETERS)
        .ok_or(PgShimError::InvalidParameterIndex(key))
}
