use std::collections::BTreeMap;

use crate::error::{PgShimError, Result};
use crate::types::SqlValue;

/// The most parameters PostgreSQL accepts in one statement.
pub const MAX_PARAMETERS: usize = 65535;

/// A set of query parameters in one of two styles.
///
/// Positional parameters are 1-based on the SQL side (`$1`, `$2`, ...) and
/// stored 0-based here. A `None` slot is an absent position: it is skipped
/// when merging and sent to the engine as NULL.
#[derive(Debug, Clone, PartialEq)]
pub enum Params {
    Positional(Vec<Option<SqlValue>>),
    Named(BTreeMap<String, SqlValue>),
}

impl Params {
    /// Builds a positional set with every slot present.
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        Params::Positional(values.into_iter().map(|v| Some(v.into())).collect())
    }

    pub fn named<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SqlValue>,
    {
        Params::Named(
            values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn style(&self) -> &'static str {
        match self {
            Params::Positional(_) => "positional",
            Params::Named(_) => "named",
        }
    }

    /// Merges `overrides` on top of `base`.
    ///
    /// Positional sets are overwritten slot by slot where `overrides` has a
    /// value; named sets are unioned with `overrides` winning on collisions.
    /// Mixing the two styles fails with `StyleMismatch`.
    pub fn merge(base: Option<&Params>, overrides: Option<&Params>) -> Result<Option<Params>> {
        let (base, overrides) = match (base, overrides) {
            (None, other) | (other, None) => return Ok(other.cloned()),
            (Some(base), Some(overrides)) => (base, overrides),
        };

        match (base, overrides) {
            (Params::Positional(base), Params::Positional(overrides)) => {
                let mut merged = base.clone();
                if merged.len() < overrides.len() {
                    merged.resize(overrides.len(), None);
                }
                for (slot, value) in merged.iter_mut().zip(overrides) {
                    if value.is_some() {
                        *slot = value.clone();
                    }
                }
                Ok(Some(Params::Positional(merged)))
            }
            (Params::Named(base), Params::Named(overrides)) => {
                let mut merged = base.clone();
                merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
                Ok(Some(Params::Named(merged)))
            }
            (base, overrides) => Err(PgShimError::StyleMismatch {
                base: base.style(),
                overrides: overrides.style(),
            }),
        }
    }

    /// Converts a parameter set to the values sent over the wire.
    /// Only positional binding reaches the engine.
    pub fn to_engine_format(params: Option<Params>) -> Result<Vec<SqlValue>> {
        match params {
            None => Ok(Vec::new()),
            Some(Params::Positional(values)) => Ok(values
                .into_iter()
                .map(|v| v.unwrap_or(SqlValue::Null))
                .collect()),
            Some(Params::Named(_)) => Err(PgShimError::NotImplemented(
                "named parameters are not supported by this driver, use positional parameters"
                    .to_string(),
            )),
        }
    }
}

impl From<Vec<SqlValue>> for Params {
    fn from(values: Vec<SqlValue>) -> Self {
        Params::positional(values)
    }
}

impl From<Vec<Option<SqlValue>>> for Params {
    fn from(values: Vec<Option<SqlValue>>) -> Self {
        Params::Positional(values)
    }
}

impl From<BTreeMap<String, SqlValue>> for Params {
    fn from(values: BTreeMap<String, SqlValue>) -> Self {
        Params::Named(values)
    }
}

/// Addresses a single parameter, either by position or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKey {
    Position(i64),
    Name(String),
}

impl From<i32> for ParamKey {
    fn from(position: i32) -> Self {
        ParamKey::Position(i64::from(position))
    }
}

impl From<i64> for ParamKey {
    fn from(position: i64) -> Self {
        ParamKey::Position(position)
    }
}

impl From<usize> for ParamKey {
    fn from(position: usize) -> Self {
        ParamKey::Position(i64::try_from(position).unwrap_or(i64::MAX))
    }
}

impl From<&str> for ParamKey {
    fn from(name: &str) -> Self {
        ParamKey::Name(name.to_string())
    }
}

impl From<String> for ParamKey {
    fn from(name: String) -> Self {
        ParamKey::Name(name)
    }
}
