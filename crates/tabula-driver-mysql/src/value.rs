use mysql_async::prelude::ToValue;
use tabula_core::stmt::Value as CoreValue;

#[derive(Debug)]
pub struct Value<'a>(pub(crate) &'a CoreValue);

impl Value<'_> {
    /// Converts a column of a fetched row. The row cast narrows the result
    /// to the column type; the text protocol returns most values as bytes.
    pub(crate) fn load(value: mysql_async::Value) -> CoreValue {
        use mysql_async::Value::*;

        match value {
            NULL => CoreValue::Null,
            Bytes(v) => CoreValue::Bytes(v),
            Int(v) => CoreValue::I64(v),
            UInt(v) => match i64::try_from(v) {
                Ok(v) => CoreValue::I64(v),
                Err(_) => CoreValue::String(v.to_string()),
            },
            Float(v) => CoreValue::F64(v as f64),
            Double(v) => CoreValue::F64(v),
            Date(year, month, day, hour, minute, second, micros) => CoreValue::String(format!(
                "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}.{micros:06}"
            )),
            Time(negative, days, hours, minutes, seconds, micros) => CoreValue::String(format!(
                "{}{}:{minutes:02}:{seconds:02}.{micros:06}",
                if negative { "-" } else { "" },
                days * 24 + u32::from(hours)
            )),
        }
    }
}

impl ToValue for Value<'_> {
    fn to_value(&self) -> mysql_async::Value {
        match self.0 {
            CoreValue::Bool(value) => value.to_value(),
            CoreValue::I32(value) => value.to_value(),
            CoreValue::I64(value) => value.to_value(),
            CoreValue::F64(value) => value.to_value(),
            CoreValue::Decimal(value) => value.to_string().to_value(),
            CoreValue::Null => mysql_async::Value::NULL,
            CoreValue::String(value) => value.to_value(),
            CoreValue::Bytes(value) => value.to_value(),
        }
    }
}
