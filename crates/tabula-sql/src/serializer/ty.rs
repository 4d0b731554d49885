use super::{Flavor, Formatter, ToSql};

use tabula_core::schema;

impl ToSql for schema::Type {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self {
            schema::Type::VarChar(length) => fmt!(f, "VARCHAR(" length ")"),
            // SQLite gives `JSON` and `DECIMAL` numeric affinity, which
            // rewrites numeric-looking text. `TEXT` keeps it verbatim.
            schema::Type::Json | schema::Type::Decimal(..) if f.flavor == Flavor::Sqlite => {
                fmt!(f, "TEXT")
            }
            schema::Type::Json => fmt!(f, "JSON"),
            schema::Type::Boolean => fmt!(f, "BOOLEAN"),
            schema::Type::Integer => fmt!(f, "INTEGER"),
            schema::Type::BigInt => fmt!(f, "BIGINT"),
            schema::Type::Decimal(precision, scale) => {
                fmt!(f, "DECIMAL(" precision "," scale ")")
            }
            schema::Type::VarBinary(length) => fmt!(f, "VARBINARY(" length ")"),
            schema::Type::Binary(length) => fmt!(f, "BINARY(" length ")"),
        }
    }
}
