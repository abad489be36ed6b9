//! pgshim - a driver-agnostic SQL connection layer over PostgreSQL
//!
//! Adapts an engine with positional-only parameters, no implicit last-insert
//! id and no forward-only cursor to a uniform connection API.
//!
//! # Example
//! ```ignore
//! use pgshim::{Connection, ConnectionConfig, Params};
//!
//! let config = ConnectionConfig::default()
//!     .with_autoinc("users", "id")
//!     .with_in_memory_cursor(true);
//! let conn = Connection::connect("postgres://localhost/mydb", config).await?;
//!
//! // Sent as `insert into users (name) values ($1) returning id`
//! let result = conn
//!     .exec("insert into users (name) values ($1)", Some(Params::positional(["John"])))
//!     .await?;
//! let id = result.inserted_id(None)?;
//!
//! let mut stmt = conn.prepare("select name from users where id = $1", None);
//! stmt.bind(1, id.clone())?;
//! let rows = stmt.all(None).await?;
//! ```

pub mod config;
pub mod cursor;
pub mod drivers;
pub mod error;
pub mod result;
pub mod rewrite;
pub mod statement;
pub mod traits;
pub mod types;

mod connection;

// Re-export main types for convenient access
pub use config::ConnectionConfig;
pub use connection::Connection;
pub use cursor::Cursor;
pub use error::{PgShimError, Result};
pub use result::{ExecResult, InsertedId};
pub use statement::{PreparedStatement, StatementId};
pub use traits::DatabaseDriver;
pub use types::{ParamKey, Params, RawQueryResult, Row, SqlValue};
