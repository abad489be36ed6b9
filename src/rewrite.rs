//! Appends a `RETURNING` clause to simple INSERT statements so the engine
//! reports the generated id, which it otherwise has no way to expose.
//!
//! Recognition is purely textual: `INSERT INTO <table> [(<columns>)] VALUES (...)`,
//! case-insensitive, optionally followed by a semicolon. Anything else
//! (INSERT ... SELECT, statements that already carry RETURNING, CTEs) is
//! passed through untouched and simply forgoes inserted-id resolution.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::ConnectionConfig;

static INSERT_VALUES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)^(?P<body>\s*insert\s+into\s+(?P<table>[^\s(]+)\s*(?:\([^)]*\)\s*)?values\s*\(.*\))\s*;?\s*$",
    )
    .expect("insert pattern is valid")
});

/// Target of a recognized INSERT statement, kept for inserted-id resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertTable {
    pub table: String,
    /// Column explicitly requested through `RETURNING <column>`.
    pub id_column: Option<String>,
}

/// SQL after rewriting, with the insert target when a clause was appended.
#[derive(Debug, Clone, PartialEq)]
pub struct Rewritten<'a> {
    pub sql: Cow<'a, str>,
    pub insert: Option<InsertTable>,
}

impl<'a> Rewritten<'a> {
    fn unchanged(sql: &'a str) -> Self {
        Self {
            sql: Cow::Borrowed(sql),
            insert: None,
        }
    }
}

/// Rewrites `sql` according to the connection's autoincrement settings.
///
/// A table listed in `autoinc_mapping` gets `RETURNING <column>`; otherwise
/// `use_returning_all` appends `RETURNING *`. With neither, the statement
/// is left as-is.
pub fn insert_returning<'a>(sql: &'a str, config: &ConnectionConfig) -> Rewritten<'a> {
    let Some(caps) = INSERT_VALUES.captures(sql) else {
        return Rewritten::unchanged(sql);
    };
    let body = &caps["body"];
    let table = caps["table"].to_string();

    if let Some(column) = config.autoinc_mapping.get(&table) {
        tracing::debug!(%table, %column, "appending RETURNING for autoincrement column");
        Rewritten {
            sql: Cow::Owned(format!("{body} returning {column}")),
            insert: Some(InsertTable {
                table,
                id_column: Some(column.clone()),
            }),
        }
    } else if config.use_returning_all {
        tracing::debug!(%table, "appending RETURNING *");
        Rewritten {
            sql: Cow::Owned(format!("{body} returning *")),
            insert: Some(InsertTable {
                table,
                id_column: None,
            }),
        }
    } else {
        Rewritten::unchanged(sql)
    }
}
