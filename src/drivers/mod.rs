mod in_memory_test;
mod postgres_value;
mod statement_cache;
mod tokio_postgres;

pub use self::in_memory_test::{InMemoryTestDriver, InMemoryTestResponseBuilder, RecordedQuery};
pub use self::tokio_postgres::TokioPostgresDriver;
