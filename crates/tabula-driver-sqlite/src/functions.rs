//! `UUID_TO_BIN` and `BIN_TO_UUID`, matching the MySQL built-ins so binary
//! UUID columns use the same statements on both stores.

use rusqlite::{
    functions::{Context, FunctionFlags},
    types::{Value, ValueRef},
    Connection, Error,
};
use uuid::Uuid;

pub(crate) fn register(connection: &Connection) -> rusqlite::Result<()> {
    let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;

    connection.create_scalar_function("UUID_TO_BIN", 1, flags, uuid_to_bin)?;
    connection.create_scalar_function("BIN_TO_UUID", 1, flags, bin_to_uuid)?;
    Ok(())
}

fn uuid_to_bin(ctx: &Context<'_>) -> rusqlite::Result<Value> {
    match ctx.get_raw(0) {
        ValueRef::Null => Ok(Value::Null),
        ValueRef::Text(text) => {
            let uuid = std::str::from_utf8(text)
                .map_err(|e| Error::UserFunctionError(e.into()))
                .and_then(|text| {
                    Uuid::parse_str(text).map_err(|e| Error::UserFunctionError(e.into()))
                })?;
            Ok(Value::Blob(uuid.as_bytes().to_vec()))
        }
        other => Err(Error::InvalidFunctionParameterType(0, other.data_type())),
    }
}

fn bin_to_uuid(ctx: &Context<'_>) -> rusqlite::Result<Value> {
    match ctx.get_raw(0) {
        ValueRef::Null => Ok(Value::Null),
        ValueRef::Blob(bytes) => {
            let uuid = Uuid::from_slice(bytes).map_err(|e| Error::UserFunctionError(e.into()))?;
            Ok(Value::Text(uuid.hyphenated().to_string()))
        }
        other => Err(Error::InvalidFunctionParameterType(0, other.data_type())),
    }
}
