use std::collections::HashMap;

use serde::Deserialize;

/// Per-connection adaptation settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Table name to the column holding its generated id.
    #[serde(alias = "autoincMapping")]
    pub autoinc_mapping: HashMap<String, String>,
    /// Append `RETURNING *` to INSERTs on tables without a mapping.
    #[serde(alias = "useReturningAll")]
    pub use_returning_all: bool,
    /// Allow `cursor()`, which buffers the whole result set in memory.
    #[serde(alias = "inMemoryCursor")]
    pub in_memory_cursor: bool,
}

impl ConnectionConfig {
    pub fn with_autoinc(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.autoinc_mapping.insert(table.into(), column.into());
        self
    }

    pub fn with_returning_all(mut self, enabled: bool) -> Self {
        self.use_returning_all = enabled;
        self
    }

    pub fn with_in_memory_cursor(mut self, enabled: bool) -> Self {
        self.in_memory_cursor = enabled;
        self
    }
}
