use thiserror::Error;

/// Error type for pgshim operations
#[derive(Debug, Error)]
pub enum PgShimError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Cannot merge {base} parameters with {overrides} parameters")]
    StyleMismatch {
        base: &'static str,
        overrides: &'static str,
    },

    #[error("Feature disabled: {0}")]
    FeatureDisabled(String),

    #[error("Parameter index {0} is out of range")]
    InvalidParameterIndex(i64),

    #[error("{}", row_count_message(.rows))]
    AmbiguousOrMissingRow { rows: usize },

    #[error("Column {column} not found in returned row (available: {available})")]
    UnknownColumn { column: String, available: String },

    #[error("Could not resolve the inserted id column (available: {available})")]
    UnresolvedInsertedId { available: String },
}

fn row_count_message(rows: &usize) -> String {
    if *rows == 0 {
        "No row returned; the INSERT needs a RETURNING clause to report the inserted id".to_string()
    } else {
        format!("Expected a single returned row to resolve the inserted id, got {rows}")
    }
}

/// Result type alias for pgshim operations
pub type Result<T> = std::result::Result<T, PgShimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_row_mentions_returning() {
        let err = PgShimError::AmbiguousOrMissingRow { rows: 0 };
        assert!(err.to_string().contains("RETURNING"));
    }

    #[test]
    fn test_ambiguous_rows_mentions_count() {
        let err = PgShimError::AmbiguousOrMissingRow { rows: 3 };
        assert!(err.to_string().contains("got 3"));
    }
}
