mod params;
mod row;
mod sql_value;

pub use params::{ParamKey, Params, MAX_PARAMETERS};
pub use row::{RawQueryResult, Row};
pub use sql_value::SqlValue;
