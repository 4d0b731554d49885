use crate::Result;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use tabula_core::{err, stmt, Error};

/// Days from 0001-01-01 (day 1 of the common era) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// A host type that can be stored in a single column.
///
/// `to_value` produces the canonical value of [`Primitive::TYPE`]; `load`
/// accepts it back. `NULL` handling for non-nullable types happens in the
/// caller, driven by [`NullPolicy`].
pub trait Primitive: Sized {
    const TYPE: stmt::Type;
    const NULLABLE: bool = false;

    fn to_value(&self) -> stmt::Value;

    fn load(value: stmt::Value) -> Result<Self>;

    /// The value a non-nullable field takes when the store holds `NULL`.
    /// Types without a natural zero return `None` and reject `NULL`.
    fn zero() -> Option<Self> {
        None
    }
}

/// What happens when a `NULL` is read into a field that cannot hold one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum NullPolicy {
    /// Integers and booleans become zero and `false`; other types fail.
    #[default]
    Coerce,

    /// Every `NULL` read into a non-`Option` field fails.
    Strict,
}

/// Loads a column value into `V`, applying the null policy.
pub(crate) fn load_column<V: Primitive>(
    value: stmt::Value,
    nulls: NullPolicy,
    column: &str,
) -> Result<V> {
    if value.is_null() && !V::NULLABLE {
        if nulls == NullPolicy::Coerce {
            if let Some(zero) = V::zero() {
                return Ok(zero);
            }
        }

        return Err(Error::type_conversion(value, std::any::type_name::<V>())
            .context(err!("reading column `{column}`")));
    }

    V::load(value).map_err(|e| e.context(err!("reading column `{column}`")))
}

impl Primitive for i32 {
    const TYPE: stmt::Type = stmt::Type::I32;

    fn to_value(&self) -> stmt::Value {
        stmt::Value::I32(*self)
    }

    fn load(value: stmt::Value) -> Result<Self> {
        match value {
            stmt::Value::I32(v) => Ok(v),
            value => Err(Error::type_conversion(value, "i32")),
        }
    }

    fn zero() -> Option<Self> {
        Some(0)
    }
}

impl Primitive for i64 {
    const TYPE: stmt::Type = stmt::Type::I64;

    fn to_value(&self) -> stmt::Value {
        stmt::Value::I64(*self)
    }

    fn load(value: stmt::Value) -> Result<Self> {
        match value {
            stmt::Value::I64(v) => Ok(v),
            value => Err(Error::type_conversion(value, "i64")),
        }
    }

    fn zero() -> Option<Self> {
        Some(0)
    }
}

impl Primitive for bool {
    const TYPE: stmt::Type = stmt::Type::Bool;

    fn to_value(&self) -> stmt::Value {
        stmt::Value::Bool(*self)
    }

    fn load(value: stmt::Value) -> Result<Self> {
        match value {
            stmt::Value::Bool(v) => Ok(v),
            value => Err(Error::type_conversion(value, "bool")),
        }
    }

    fn zero() -> Option<Self> {
        Some(false)
    }
}

impl Primitive for String {
    const TYPE: stmt::Type = stmt::Type::String;

    fn to_value(&self) -> stmt::Value {
        stmt::Value::String(self.clone())
    }

    fn load(value: stmt::Value) -> Result<Self> {
        match value {
            stmt::Value::String(v) => Ok(v),
            value => Err(Error::type_conversion(value, "String")),
        }
    }
}

impl Primitive for BigDecimal {
    const TYPE: stmt::Type = stmt::Type::Decimal;

    fn to_value(&self) -> stmt::Value {
        stmt::Value::Decimal(self.clone())
    }

    fn load(value: stmt::Value) -> Result<Self> {
        match value {
            stmt::Value::Decimal(v) => Ok(v),
            value => Err(Error::type_conversion(value, "BigDecimal")),
        }
    }
}

impl Primitive for uuid::Uuid {
    const TYPE: stmt::Type = stmt::Type::Uuid;

    fn to_value(&self) -> stmt::Value {
        stmt::Value::String(self.hyphenated().to_string())
    }

    fn load(value: stmt::Value) -> Result<Self> {
        let parsed = value.as_str().and_then(|v| uuid::Uuid::parse_str(v).ok());
        parsed.ok_or_else(|| Error::type_conversion(value, "Uuid"))
    }
}

impl Primitive for Vec<u8> {
    const TYPE: stmt::Type = stmt::Type::Bytes;

    fn to_value(&self) -> stmt::Value {
        stmt::Value::Bytes(self.clone())
    }

    fn load(value: stmt::Value) -> Result<Self> {
        match value {
            stmt::Value::Bytes(v) => Ok(v),
            value => Err(Error::type_conversion(value, "Vec<u8>")),
        }
    }
}

impl Primitive for DateTime<Utc> {
    const TYPE: stmt::Type = stmt::Type::DateTime;

    fn to_value(&self) -> stmt::Value {
        stmt::Value::I64(self.timestamp_millis())
    }

    fn load(value: stmt::Value) -> Result<Self> {
        let loaded = value.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis);
        loaded.ok_or_else(|| Error::type_conversion(value, "DateTime<Utc>"))
    }
}

impl Primitive for NaiveDate {
    const TYPE: stmt::Type = stmt::Type::Date;

    fn to_value(&self) -> stmt::Value {
        stmt::Value::I64(self.num_days_from_ce() as i64 - UNIX_EPOCH_DAYS_FROM_CE)
    }

    fn load(value: stmt::Value) -> Result<Self> {
        let loaded = value
            .as_i64()
            .and_then(|days| i32::try_from(days + UNIX_EPOCH_DAYS_FROM_CE).ok())
            .and_then(NaiveDate::from_num_days_from_ce_opt);
        loaded.ok_or_else(|| Error::type_conversion(value, "NaiveDate"))
    }
}

impl Primitive for serde_json::Value {
    const TYPE: stmt::Type = stmt::Type::Json;

    fn to_value(&self) -> stmt::Value {
        stmt::Value::String(self.to_string())
    }

    fn load(value: stmt::Value) -> Result<Self> {
        let parsed = value.as_str().and_then(|v| serde_json::from_str(v).ok());
        parsed.ok_or_else(|| Error::type_conversion(value, "serde_json::Value"))
    }
}

impl<T: Primitive> Primitive for Option<T> {
    const TYPE: stmt::Type = T::TYPE;
    const NULLABLE: bool = true;

    fn to_value(&self) -> stmt::Value {
        match self {
            Some(value) => value.to_value(),
            None => stmt::Value::Null,
        }
    }

    fn load(value: stmt::Value) -> Result<Self> {
        match value {
            stmt::Value::Null => Ok(None),
            value => T::load(value).map(Some),
        }
    }
}

/// Implements [`Primitive`] for a fieldless enum, storing each variant by
/// name.
///
/// ```
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Status {
///     Draft,
///     Published,
/// }
///
/// tabula::enumeration!(Status { Draft, Published });
///
/// use tabula::Primitive;
/// assert_eq!(Status::load(Status::Published.to_value()).unwrap(), Status::Published);
/// assert!(Status::load("Archived".into()).is_err());
/// ```
#[macro_export]
macro_rules! enumeration {
    ($ty:ident { $( $variant:ident ),+ $(,)? }) => {
        impl $crate::Primitive for $ty {
            const TYPE: $crate::stmt::Type = $crate::stmt::Type::Enum;

            fn to_value(&self) -> $crate::stmt::Value {
                let name = match self {
                    $( $ty::$variant => stringify!($variant), )+
                };
                $crate::stmt::Value::String(name.to_string())
            }

            fn load(value: $crate::stmt::Value) -> $crate::Result<Self> {
                let variant = match value.as_str() {
                    $( Some(stringify!($variant)) => Some($ty::$variant), )+
                    _ => None,
                };
                variant.ok_or_else(|| $crate::Error::type_conversion(value, stringify!($ty)))
            }
        }
    };
}
