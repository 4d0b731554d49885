use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef};
use tabula_core::stmt;

/// Binds a tabula value as a SQLite parameter.
#[derive(Debug)]
pub(crate) struct Value<'a>(pub(crate) &'a stmt::Value);

impl Value<'_> {
    /// Converts a column of a fetched row. Values keep SQLite's storage
    /// class; the row cast narrows them to the column type.
    pub(crate) fn load(value: ValueRef<'_>) -> stmt::Value {
        match value {
            ValueRef::Null => stmt::Value::Null,
            ValueRef::Integer(v) => stmt::Value::I64(v),
            ValueRef::Real(v) => stmt::Value::F64(v),
            // Invalid UTF-8 stays raw so the column cast can reject it
            ValueRef::Text(v) => match std::str::from_utf8(v) {
                Ok(text) => stmt::Value::String(text.to_string()),
                Err(_) => stmt::Value::Bytes(v.to_vec()),
            },
            ValueRef::Blob(v) => stmt::Value::Bytes(v.to_vec()),
        }
    }
}

impl ToSql for Value<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        use stmt::Value;

        match self.0 {
            Value::Bool(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v as i64))),
            Value::I32(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v as i64))),
            Value::I64(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v))),
            Value::F64(v) => Ok(ToSqlOutput::Owned(SqlValue::Real(*v))),
            // Decimal columns are created as TEXT, so the digits are kept as written
            Value::Decimal(v) => Ok(ToSqlOutput::Owned(SqlValue::Text(v.to_string()))),
            Value::String(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes()))),
            Value::Bytes(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Blob(&v[..]))),
            Value::Null => Ok(ToSqlOutput::Owned(SqlValue::Null)),
        }
    }
}
