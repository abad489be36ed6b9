use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::drivers::statement_cache::StatementCache;
use crate::error::{PgShimError, Result};
use crate::statement::StatementId;
use crate::traits::DatabaseDriver;
use crate::types::{RawQueryResult, SqlValue};

/// A query as the engine ran it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedQuery {
    pub sql: String,
    pub params: Vec<SqlValue>,
    pub statement: Option<StatementId>,
}

/// An in-memory database driver for testing.
///
/// Responses are queued up front and handed out in order; every query,
/// script and close is recorded. Queries run with a statement id go through
/// the same parse cache as the real driver, and the recorded SQL is the
/// cached text that would have been executed.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use pgshim::drivers::{InMemoryTestDriver, InMemoryTestResponseBuilder};
/// use pgshim::types::SqlValue;
///
/// let driver = Arc::new(
///     InMemoryTestDriver::new().with_response(
///         InMemoryTestResponseBuilder::new()
///             .columns(&["id", "name"])
///             .row(vec![SqlValue::Int32(1), SqlValue::from("Alice")])
///             .build(),
///     ),
/// );
/// ```
pub struct InMemoryTestDriver {
    responses: Mutex<VecDeque<Result<RawQueryResult>>>,
    recorded_queries: Mutex<Vec<RecordedQuery>>,
    recorded_scripts: Mutex<Vec<String>>,
    statements: StatementCache<String>,
    parses: AtomicUsize,
    closed: AtomicBool,
}

impl InMemoryTestDriver {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            recorded_queries: Mutex::new(Vec::new()),
            recorded_scripts: Mutex::new(Vec::new()),
            statements: StatementCache::new(),
            parses: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Queue a response for the next query. An empty result is returned
    /// once the queue runs dry.
    pub fn with_response(self, response: RawQueryResult) -> Self {
        self.responses.lock().unwrap().push_back(Ok(response));
        self
    }

    /// Make the next query fail with the given engine error message.
    pub fn with_error(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(PgShimError::QueryFailed(message.to_string())));
        self
    }

    pub fn recorded_queries(&self) -> Vec<RecordedQuery> {
        self.recorded_queries.lock().unwrap().clone()
    }

    pub fn last_query(&self) -> Option<RecordedQuery> {
        self.recorded_queries.lock().unwrap().last().cloned()
    }

    /// Every script passed to `batch_execute`.
    pub fn recorded_scripts(&self) -> Vec<String> {
        self.recorded_scripts.lock().unwrap().clone()
    }

    /// How many statements were parsed into the cache.
    pub fn parsed_statements(&self) -> usize {
        self.parses.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn assert_last_query(&self, expected_sql: &str, expected_params: &[SqlValue]) {
        let last = self.last_query().expect("no queries were recorded");
        assert_eq!(last.sql, expected_sql);
        assert_eq!(last.params, expected_params);
    }

    pub fn assert_query_count(&self, expected: usize) {
        assert_eq!(self.recorded_queries.lock().unwrap().len(), expected);
    }
}

impl Default for InMemoryTestDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseDriver for InMemoryTestDriver {
    async fn execute(
        &self,
        sql: &str,
        params: &[SqlValue],
        statement: Option<StatementId>,
    ) -> Result<RawQueryResult> {
        let executed = match statement {
            Some(id) => self.statements.get(id, sql).unwrap_or_else(|| {
                self.parses.fetch_add(1, Ordering::SeqCst);
                self.statements.insert(id, sql, sql.to_string());
                sql.to_string()
            }),
            None => sql.to_string(),
        };
        self.recorded_queries.lock().unwrap().push(RecordedQuery {
            sql: executed,
            params: params.to_vec(),
            statement,
        });

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(RawQueryResult::empty()))
    }

    async fn batch_execute(&self, sql: &str) -> Result<()> {
        self.recorded_scripts.lock().unwrap().push(sql.to_string());
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.statements.clear();
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Builds a [`RawQueryResult`] for queuing on the driver.
pub struct InMemoryTestResponseBuilder {
    columns: Vec<String>,
    rows: Vec<Vec<SqlValue>>,
    rows_affected: Option<u64>,
}

impl InMemoryTestResponseBuilder {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            rows_affected: None,
        }
    }

    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.columns = cols.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Add a row of values in column order.
    pub fn row(mut self, values: Vec<SqlValue>) -> Self {
        self.rows.push(values);
        self
    }

    /// Override the affected row count, which otherwise equals the row count.
    pub fn rows_affected(mut self, count: u64) -> Self {
        self.rows_affected = Some(count);
        self
    }

    pub fn build(self) -> RawQueryResult {
        let rows_affected = self.rows_affected.unwrap_or(self.rows.len() as u64);
        RawQueryResult::new(self.columns, self.rows, rows_affected)
    }
}

impl Default for InMemoryTestResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
