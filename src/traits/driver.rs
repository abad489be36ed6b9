use async_trait::async_trait;

use crate::error::Result;
use crate::statement::StatementId;
use crate::types::{RawQueryResult, SqlValue};

/// Trait for the engine session underneath a [`Connection`](crate::Connection).
/// Drivers are responsible for:
/// - Connecting to the database
/// - Converting SqlValue parameters to native types
/// - Executing queries and converting results to RawQueryResult
///
/// Errors raised by the engine are returned as-is; the connection layer
/// does not retry or reinterpret them.
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    /// Execute a SQL statement with positional parameters ($1, $2, etc.).
    ///
    /// When `statement` is given the driver may keep the parsed statement
    /// under that id and reuse it on later calls with the same id.
    async fn execute(
        &self,
        sql: &str,
        params: &[SqlValue],
        statement: Option<StatementId>,
    ) -> Result<RawQueryResult>;

    /// Execute one or more statements without parameters.
    async fn batch_execute(&self, sql: &str) -> Result<()>;

    /// End the session.
    async fn close(&self) -> Result<()>;
}
