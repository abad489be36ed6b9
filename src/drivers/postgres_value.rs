use std::error::Error;
use std::str::FromStr;

use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use tokio_postgres::types::{to_sql_checked, FromSql, IsNull, ToSql, Type};
use uuid::Uuid;

use crate::types::SqlValue;

type BoxError = Box<dyn Error + Sync + Send>;

impl<'a> FromSql<'a> for SqlValue {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
        let value = match *ty {
            Type::BOOL => decode(ty, raw, SqlValue::Bool),
            Type::INT2 => decode(ty, raw, |v: i16| SqlValue::Int32(v.into())),
            Type::INT4 => decode(ty, raw, SqlValue::Int32),
            Type::INT8 => decode(ty, raw, SqlValue::Int64),
            Type::OID => decode(ty, raw, |v: u32| SqlValue::Int64(v.into())),
            Type::FLOAT4 => decode(ty, raw, |v: f32| SqlValue::Float64(v.into())),
            Type::FLOAT8 => decode(ty, raw, SqlValue::Float64),
            Type::NUMERIC => decode(ty, raw, SqlValue::Decimal),
            Type::BYTEA => decode(ty, raw, SqlValue::Bytes),
            Type::JSON | Type::JSONB => decode(ty, raw, SqlValue::Json),
            Type::DATE => decode(ty, raw, SqlValue::Date),
            Type::TIMESTAMP => decode(ty, raw, SqlValue::Timestamp),
            Type::TIMESTAMPTZ => decode(ty, raw, SqlValue::TimestampTz),
            Type::UUID => decode(ty, raw, SqlValue::Uuid),
            _ if <String as FromSql>::accepts(ty) => decode(ty, raw, SqlValue::Text),
            _ => {
                tracing::trace!(column_type = %ty, "no decoder for column type, keeping raw bytes");
                SqlValue::Bytes(raw.to_vec())
            }
        };
        Ok(value)
    }

    fn from_sql_null(_ty: &Type) -> Result<Self, BoxError> {
        Ok(SqlValue::Null)
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}

/// Decodes one column value. Values that fail to decode (numeric NaN,
/// infinite timestamps) come back as their raw bytes.
fn decode<'a, T, F>(ty: &Type, raw: &'a [u8], wrap: F) -> SqlValue
where
    T: FromSql<'a>,
    F: FnOnce(T) -> SqlValue,
{
    match T::from_sql(ty, raw) {
        Ok(value) => wrap(value),
        Err(e) => {
            tracing::debug!(column_type = %ty, error = %e, "column value kept as raw bytes");
            SqlValue::Bytes(raw.to_vec())
        }
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self {
            SqlValue::Null => Ok(IsNull::Yes),
            SqlValue::Text(v) => encode_text(v, ty, out),
            SqlValue::Int32(v) => encode_integer(i64::from(*v), ty, out),
            SqlValue::Int64(v) => encode_integer(*v, ty, out),
            SqlValue::Float64(v) => match *ty {
                Type::FLOAT4 => (*v as f32).to_sql_checked(ty, out),
                Type::NUMERIC => Decimal::try_from(*v)?.to_sql_checked(ty, out),
                _ => v.to_sql_checked(ty, out),
            },
            SqlValue::Bool(v) => v.to_sql_checked(ty, out),
            SqlValue::Decimal(v) => v.to_sql_checked(ty, out),
            SqlValue::Bytes(v) => v.to_sql_checked(ty, out),
            SqlValue::Json(v) => v.to_sql_checked(ty, out),
            SqlValue::Date(v) => v.to_sql_checked(ty, out),
            SqlValue::Timestamp(v) => v.to_sql_checked(ty, out),
            SqlValue::TimestampTz(v) => v.to_sql_checked(ty, out),
            SqlValue::Uuid(v) => v.to_sql_checked(ty, out),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

fn encode_integer(value: i64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::INT2 => i16::try_from(value)?.to_sql_checked(ty, out),
        Type::INT4 => i32::try_from(value)?.to_sql_checked(ty, out),
        Type::OID => u32::try_from(value)?.to_sql_checked(ty, out),
        Type::FLOAT4 => (value as f32).to_sql_checked(ty, out),
        Type::FLOAT8 => (value as f64).to_sql_checked(ty, out),
        Type::NUMERIC => Decimal::from(value).to_sql_checked(ty, out),
        _ => value.to_sql_checked(ty, out),
    }
}

/// Text is parsed for the types clients commonly pass as strings.
fn encode_text(value: &str, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::UUID => Uuid::parse_str(value)?.to_sql_checked(ty, out),
        Type::NUMERIC => Decimal::from_str(value)?.to_sql_checked(ty, out),
        Type::JSON | Type::JSONB => {
            serde_json::from_str::<serde_json::Value>(value)?.to_sql_checked(ty, out)
        }
        _ => value.to_sql_checked(ty, out),
    }
}
