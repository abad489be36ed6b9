use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::statement::StatementId;

/// Parsed statements held by one engine session.
///
/// A statement id is only unique within the connection that issued it, and
/// several connections may share one driver, so entries are keyed by the id
/// together with the SQL text.
pub(crate) struct StatementCache<S> {
    entries: Mutex<HashMap<(StatementId, String), S>>,
}

impl<S: Clone> StatementCache<S> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<(StatementId, String), S>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn get(&self, id: StatementId, sql: &str) -> Option<S> {
        self.entries().get(&(id, sql.to_string())).cloned()
    }

    pub(crate) fn insert(&self, id: StatementId, sql: &str, statement: S) {
        self.entries().insert((id, sql.to_string()), statement);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries().len()
    }

    pub(crate) fn clear(&self) {
        self.entries().clear();
    }
}
