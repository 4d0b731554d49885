use super::Table;
use crate::{Error, Result};

use std::collections::HashSet;

struct Verify<'a> {
    table: &'a Table,
}

impl Table {
    pub(super) fn verify(&self) -> Result<()> {
        Verify { table: self }.verify()
    }
}

impl Verify<'_> {
    fn verify(&self) -> Result<()> {
        if self.table.name.is_empty() {
            return Err(Error::invalid_schema("table name must not be empty"));
        }

        if self.table.columns.is_empty() {
            return Err(self.error("has no columns".to_string()));
        }

        self.verify_column_names_are_unique()?;
        self.verify_auto_increment()?;
        self.verify_sizing()?;
        self.verify_foreign_keys()?;
        self.verify_index_names_are_unique()?;
        Ok(())
    }

    fn verify_column_names_are_unique(&self) -> Result<()> {
        let mut names = HashSet::new();

        for column in &self.table.columns {
            if column.name.is_empty() {
                return Err(self.error("has a column with an empty name".to_string()));
            }

            if !names.insert(&column.name) {
                return Err(self.error(format!("has duplicate column `{}`", column.name)));
            }
        }

        Ok(())
    }

    fn verify_auto_increment(&self) -> Result<()> {
        for column in &self.table.columns {
            if !column.auto_increment {
                continue;
            }

            if !column.primary_key {
                return Err(self.error(format!(
                    "column `{}` is auto_increment but not the primary key",
                    column.name
                )));
            }

            if !column.ty.is_integer() {
                return Err(self.error(format!(
                    "column `{}` is auto_increment but has non-integer type {}",
                    column.name,
                    column.ty.name()
                )));
            }
        }

        Ok(())
    }

    fn verify_sizing(&self) -> Result<()> {
        for column in &self.table.columns {
            if column.length == 0 {
                return Err(self.error(format!("column `{}` has zero length", column.name)));
            }

            if column.scale > column.precision {
                return Err(self.error(format!(
                    "column `{}` has scale {} greater than precision {}",
                    column.name, column.scale, column.precision
                )));
            }
        }

        Ok(())
    }

    fn verify_foreign_keys(&self) -> Result<()> {
        for (column, foreign_key) in self.table.foreign_keys() {
            if foreign_key.table.is_empty() || foreign_key.column.is_empty() {
                return Err(self.error(format!(
                    "column `{}` has an incomplete foreign key",
                    column.name
                )));
            }
        }

        Ok(())
    }

    fn verify_index_names_are_unique(&self) -> Result<()> {
        let mut names = HashSet::new();

        for (column, index) in self.table.indices() {
            if index.name.is_empty() {
                return Err(self.error(format!(
                    "index on column `{}` has an empty name",
                    column.name
                )));
            }

            if !names.insert(&index.name) {
                return Err(self.error(format!("has duplicate index name `{}`", index.name)));
            }
        }

        Ok(())
    }

    fn error(&self, message: String) -> Error {
        Error::invalid_schema(format!("table `{}` {message}", self.table.name))
    }
}
