//! Renders table metadata into SQL text.
//!
//! Every statement uses `?` placeholders. Table and column names are written
//! exactly as declared.

#[macro_use]
mod fmt;
use fmt::ToSql;

mod column;
use column::{Assignment, Name, Placeholder, Projection, Selected};

mod column_def;
use column_def::{ColumnDef, Constraint};

mod delim;
use delim::{Comma, CommaSpace};

mod flavor;
use flavor::Flavor;

mod ty;

use tabula_core::{
    schema::{Column, Index, Table},
    Error, Result,
};

/// Serialize table metadata to SQL strings
#[derive(Debug, Clone, Copy)]
pub struct Serializer {
    /// The database flavor handles the differences between SQL dialects.
    flavor: Flavor,

    /// Emit `TRUNCATE TABLE`; otherwise truncation is an unconditional `DELETE`.
    truncate_table: bool,
}

struct Formatter<'a> {
    /// Where to write the serialized SQL
    dst: &'a mut String,

    flavor: Flavor,
}

impl Serializer {
    fn serialize(&self, f: impl FnOnce(&mut Formatter<'_>)) -> String {
        let mut ret = String::new();
        f(&mut Formatter {
            dst: &mut ret,
            flavor: self.flavor,
        });
        ret
    }

    /// `SELECT c1,c2,... FROM table`
    pub fn select_all(&self, table: &Table) -> Result<String> {
        let columns = Comma(columns(table)?.iter().map(Selected));
        let name = &table.name;

        Ok(self.serialize(|f| fmt!(f, "SELECT " columns " FROM " name)))
    }

    /// `SELECT ... FROM table WHERE key=?`
    pub fn select_by_key(&self, table: &Table) -> Result<String> {
        let select = self.select_all(table)?;
        let key = Projection(table.require_primary_key("get")?);

        Ok(self.serialize(|f| fmt!(f, (&select) " WHERE " key "=?")))
    }

    /// `INSERT INTO table (c1,c2,...) VALUES (?,?,...)`, key included
    pub fn insert(&self, table: &Table) -> Result<String> {
        let columns = columns(table)?;
        let names = Comma(columns.iter().map(Name));
        let placeholders = Comma(columns.iter().map(Placeholder));
        let name = &table.name;

        Ok(self.serialize(|f| {
            fmt!(f, "INSERT INTO " name " (" names ") VALUES (" placeholders ")")
        }))
    }

    /// `UPDATE table SET c1=?, c2=? WHERE key=?`
    ///
    /// The key is bound last, after every other column in declaration order.
    pub fn update(&self, table: &Table) -> Result<String> {
        let key = table.require_primary_key("update")?;

        let assignments: Vec<_> = columns(table)?
            .iter()
            .filter(|column| !column.primary_key)
            .map(Assignment)
            .collect();

        if assignments.is_empty() {
            return Err(Error::invalid_schema(format!(
                "table `{}` has no columns to update besides its primary key",
                table.name
            )));
        }

        let assignments = CommaSpace(assignments);
        let key = Projection(key);
        let name = &table.name;

        Ok(self.serialize(|f| {
            fmt!(f, "UPDATE " name " SET " assignments " WHERE " key "=?")
        }))
    }

    /// `DELETE FROM table WHERE key=?`
    pub fn delete(&self, table: &Table) -> Result<String> {
        let key = Projection(table.require_primary_key("delete")?);
        let name = &table.name;

        Ok(self.serialize(|f| fmt!(f, "DELETE FROM " name " WHERE " key "=?")))
    }

    /// `DELETE FROM table`
    pub fn delete_all(&self, table: &Table) -> Result<String> {
        columns(table)?;
        let name = &table.name;

        Ok(self.serialize(|f| fmt!(f, "DELETE FROM " name)))
    }

    /// Removes every row. Dialects without `TRUNCATE` delete instead.
    pub fn truncate(&self, table: &Table) -> Result<String> {
        if !self.truncate_table {
            return self.delete_all(table);
        }

        columns(table)?;
        let name = &table.name;

        Ok(self.serialize(|f| fmt!(f, "TRUNCATE TABLE " name)))
    }

    /// `SELECT MAX(key) FROM table`
    pub fn select_max_key(&self, table: &Table) -> Result<String> {
        let key = Name(table.require_primary_key("key generation")?);
        let name = &table.name;

        Ok(self.serialize(|f| fmt!(f, "SELECT MAX(" key ") FROM " name)))
    }

    /// `CREATE TABLE IF NOT EXISTS table (column definitions[,constraints])`
    pub fn create_table(&self, table: &Table) -> Result<String> {
        let definitions = Comma(columns(table)?.iter().map(ColumnDef));
        let constraints: Vec<_> = table
            .foreign_keys()
            .map(|(column, foreign_key)| Constraint(column, foreign_key))
            .collect();
        let has_constraints = !constraints.is_empty();
        let constraints = Comma(constraints);
        let name = &table.name;

        Ok(self.serialize(|f| {
            fmt!(f, "CREATE TABLE IF NOT EXISTS " name " (" definitions);

            if has_constraints {
                fmt!(f, "," constraints);
            }

            fmt!(f, ")");
        }))
    }

    /// `CREATE [UNIQUE ]INDEX name ON table (column)`
    pub fn create_index(&self, table: &Table, column: &Column, index: &Index) -> String {
        let index_name = &index.name;
        let column = Name(column);
        let name = &table.name;

        self.serialize(|f| {
            fmt!(f, "CREATE ");

            if index.unique {
                fmt!(f, "UNIQUE ");
            }

            fmt!(f, "INDEX " index_name " ON " name " (" column ")");
        })
    }

    /// `DROP TABLE [IF EXISTS ]table`
    pub fn drop_table(&self, table: &Table, if_exists: bool) -> String {
        let name = &table.name;

        self.serialize(|f| {
            fmt!(f, "DROP TABLE ");

            if if_exists {
                fmt!(f, "IF EXISTS ");
            }

            fmt!(f, name);
        })
    }
}

fn columns(table: &Table) -> Result<&[Column]> {
    if table.name.is_empty() {
        return Err(Error::invalid_schema("table has no name"));
    }

    if table.columns.is_empty() {
        return Err(Error::invalid_schema(format!(
            "table `{}` has no columns",
            table.name
        )));
    }

    Ok(&table.columns)
}
