use std::sync::Mutex;

use async_trait::async_trait;
use futures_util::{pin_mut, TryStreamExt};
use tokio::task::JoinHandle;
use tokio_postgres::{types::ToSql, Client, NoTls, Statement};

use crate::drivers::statement_cache::StatementCache;
use crate::error::{PgShimError, Result};
use crate::statement::StatementId;
use crate::traits::DatabaseDriver;
use crate::types::{RawQueryResult, SqlValue};

/// PostgreSQL driver implementation using tokio-postgres.
///
/// Statements run with a [`StatementId`] are parsed once and cached for the
/// lifetime of the session.
pub struct TokioPostgresDriver {
    client: Client,
    statements: StatementCache<Statement>,
    connection: Mutex<Option<JoinHandle<()>>>,
}

impl TokioPostgresDriver {
    /// Connect to a PostgreSQL database.
    pub async fn connect(connection_string: &str) -> Result<Self> {
        let (client, connection) = tokio_postgres::connect(connection_string, NoTls)
            .await
            .map_err(|e| PgShimError::ConnectionFailed(e.to_string()))?;

        // Spawn the connection handler
        let handle = tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "PostgreSQL connection error");
            }
        });

        Ok(Self {
            client,
            statements: StatementCache::new(),
            connection: Mutex::new(Some(handle)),
        })
    }

    async fn statement(&self, sql: &str, id: Option<StatementId>) -> Result<Statement> {
        let Some(id) = id else {
            return self.client.prepare(sql).await.map_err(query_failed);
        };

        if let Some(statement) = self.statements.get(id, sql) {
            return Ok(statement);
        }
        let statement = self.client.prepare(sql).await.map_err(query_failed)?;
        tracing::trace!(statement = %id, "cached parsed statement");
        self.statements.insert(id, sql, statement.clone());
        Ok(statement)
    }
}

#[async_trait]
impl DatabaseDriver for TokioPostgresDriver {
    async fn execute(
        &self,
        sql: &str,
        params: &[SqlValue],
        statement: Option<StatementId>,
    ) -> Result<RawQueryResult> {
        let statement = self.statement(sql, statement).await?;

        let param_refs = params.iter().map(|p| p as &(dyn ToSql + Sync));
        let stream = self
            .client
            .query_raw(&statement, param_refs)
            .await
            .map_err(query_failed)?;
        pin_mut!(stream);

        let mut rows = Vec::new();
        while let Some(row) = stream.try_next().await.map_err(query_failed)? {
            let values = (0..row.len())
                .map(|i| row.try_get::<_, SqlValue>(i))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(query_failed)?;
            rows.push(values);
        }
        let rows_affected = stream.rows_affected().unwrap_or(rows.len() as u64);

        let columns = statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        Ok(RawQueryResult::new(columns, rows, rows_affected))
    }

    async fn batch_execute(&self, sql: &str) -> Result<()> {
        self.client.batch_execute(sql).await.map_err(query_failed)
    }

    async fn close(&self) -> Result<()> {
        self.statements.clear();
        let handle = self
            .connection
            .lock()
            .map_err(|_| PgShimError::ConnectionFailed("connection state poisoned".to_string()))?
            .take();
        if let Some(handle) = handle {
            handle.abort();
            tracing::debug!("PostgreSQL session closed");
        }
        Ok(())
    }
}

fn query_failed(e: tokio_postgres::Error) -> PgShimError {
    PgShimError::QueryFailed(e.to_string())
}
