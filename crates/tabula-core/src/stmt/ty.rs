use super::Value;
use crate::{Error, Result};

use bigdecimal::BigDecimal;
use std::str::FromStr;

/// Logical type of a column.
///
/// Each logical type has one canonical [`Value`] representation:
///
/// | type | canonical value |
/// |---|---|
/// | `String`, `Enum`, `Json` | `Value::String` |
/// | `I32` | `Value::I32` |
/// | `I64`, `DateTime`, `Date` | `Value::I64` |
/// | `Bool` | `Value::Bool` |
/// | `Decimal` | `Value::Decimal` |
/// | `Uuid` | `Value::String`, canonical hyphenated text |
/// | `Bytes` | `Value::Bytes` |
///
/// `Null` is valid for every type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// Text
    String,

    /// Signed 32-bit integer
    I32,

    /// Signed 64-bit integer
    I64,

    /// Boolean
    Bool,

    /// Arbitrary-precision decimal
    Decimal,

    /// UUID, stored as text or as 16 bytes depending on the column
    Uuid,

    /// Binary blob
    Bytes,

    /// Instant stored as milliseconds since the Unix epoch
    DateTime,

    /// Calendar date stored as days since the Unix epoch
    Date,

    /// Enumerated type stored by variant name
    Enum,

    /// JSON document
    Json,
}

impl Type {
    pub fn is_integer(&self) -> bool {
        matches!(self, Type::I32 | Type::I64)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Type::String | Type::Enum | Type::Json)
    }

    /// Normalizes a value read from a driver into the canonical
    /// representation of this type.
    pub fn cast(&self, value: Value) -> Result<Value> {
        use Type::*;

        Ok(match (self, value) {
            (_, Value::Null) => Value::Null,

            (String | Enum | Json, Value::String(v)) => Value::String(v),
            (String | Enum | Json, Value::Bytes(v)) => Value::String(utf8(v, self)?),
            // SQLite applies numeric affinity to `JSON` columns
            (String | Json, Value::I64(v)) => Value::String(v.to_string()),
            (String | Json, Value::F64(v)) => Value::String(v.to_string()),

            (I32, Value::I32(v)) => Value::I32(v),
            (I32, Value::I64(v)) => match i32::try_from(v) {
                Ok(v) => Value::I32(v),
                Err(_) => return Err(Error::type_conversion(Value::I64(v), "i32")),
            },
            (I32, Value::Bool(v)) => Value::I32(v as i32),
            (I32, value @ (Value::String(_) | Value::Bytes(_))) => {
                Value::I32(parse(value, "i32")?)
            }

            (I64 | DateTime | Date, Value::I64(v)) => Value::I64(v),
            (I64 | DateTime | Date, Value::I32(v)) => Value::I64(v as i64),
            (I64 | DateTime | Date, value @ (Value::String(_) | Value::Bytes(_))) => {
                Value::I64(parse(value, "i64")?)
            }

            (Bool, Value::Bool(v)) => Value::Bool(v),
            (Bool, Value::I64(v)) => Value::Bool(v != 0),
            (Bool, Value::I32(v)) => Value::Bool(v != 0),
            (Bool, value @ (Value::String(_) | Value::Bytes(_))) => {
                Value::Bool(parse::<i64>(value, "bool")? != 0)
            }

            (Decimal, Value::Decimal(v)) => Value::Decimal(v),
            (Decimal, Value::I64(v)) => Value::Decimal(BigDecimal::from(v)),
            (Decimal, Value::I32(v)) => Value::Decimal(BigDecimal::from(v)),
            (Decimal, Value::F64(v)) => match BigDecimal::from_str(&v.to_string()) {
                Ok(v) => Value::Decimal(v),
                Err(_) => return Err(Error::type_conversion(Value::F64(v), "BigDecimal")),
            },
            (Decimal, value @ (Value::String(_) | Value::Bytes(_))) => {
                Value::Decimal(parse(value, "BigDecimal")?)
            }

            (Uuid, Value::String(v)) => Value::String(v),
            (Uuid, Value::Bytes(v)) if v.len() == 16 => match uuid::Uuid::from_slice(&v) {
                Ok(uuid) => Value::String(uuid.to_string()),
                Err(_) => return Err(Error::type_conversion(Value::Bytes(v), "Uuid")),
            },
            (Uuid, Value::Bytes(v)) => Value::String(utf8(v, self)?),

            (Bytes, Value::Bytes(v)) => Value::Bytes(v),
            (Bytes, Value::String(v)) => Value::Bytes(v.into_bytes()),

            (_, value) => return Err(Error::type_conversion(value, self.name())),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Type::String => "String",
            Type::I32 => "I32",
            Type::I64 => "I64",
            Type::Bool => "Bool",
            Type::Decimal => "Decimal",
            Type::Uuid => "Uuid",
            Type::Bytes => "Bytes",
            Type::DateTime => "DateTime",
            Type::Date => "Date",
            Type::Enum => "Enum",
            Type::Json => "Json",
        }
    }
}

fn utf8(bytes: Vec<u8>, ty: &Type) -> Result<String> {
    String::from_utf8(bytes)
        .map_err(|err| Error::type_conversion(Value::Bytes(err.into_bytes()), ty.name()))
}

fn parse<T: FromStr>(value: Value, to_type: &'static str) -> Result<T> {
    let parsed = match &value {
        Value::String(v) => v.trim().parse().ok(),
        Value::Bytes(v) => core::str::from_utf8(v)
            .ok()
            .and_then(|v| v.trim().parse().ok()),
        _ => None,
    };

    parsed.ok_or_else(|| Error::type_conversion(value, to_type))
}
