use super::{Formatter, ToSql};

use tabula_core::schema::{Column, ForeignKey};

/// A column clause of CREATE TABLE.
pub(super) struct ColumnDef<'a>(pub(super) &'a Column);

/// A FOREIGN KEY table constraint.
pub(super) struct Constraint<'a>(pub(super) &'a Column, pub(super) &'a ForeignKey);

impl ToSql for ColumnDef<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let column = self.0;
        let name = &column.name;
        let ty = column.storage_ty();

        fmt!(f, name " " ty);

        if column.primary_key {
            fmt!(f, " PRIMARY KEY");
        }

        if !column.nullable {
            fmt!(f, " NOT NULL");
        }

        if column.unique {
            fmt!(f, " UNIQUE");
        }
    }
}

impl ToSql for Constraint<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let Constraint(column, foreign_key) = self;
        let name = &column.name;
        let table = &foreign_key.table;
        let target = &foreign_key.column;

        fmt!(f, "FOREIGN KEY (" name ") REFERENCES " table "(" target ")");

        if let Some(action) = foreign_key.on_update.as_sql() {
            fmt!(f, " ON UPDATE " action);
        }

        if let Some(action) = foreign_key.on_delete.as_sql() {
            fmt!(f, " ON DELETE " action);
        }
    }
}
