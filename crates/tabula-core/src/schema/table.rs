use super::{Column, ForeignKey, Index, PrimaryKey};
use crate::{Error, Result};

use std::{
    fmt,
    sync::atomic::{AtomicUsize, Ordering},
};

/// A database table
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Uniquely identifies a table
    pub id: TableId,

    /// Name of the table
    pub name: String,

    /// The table's columns, in declaration order
    pub columns: Vec<Column>,

    pub primary_key: Option<PrimaryKey>,
}

/// Uniquely identifies a table within the process
#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct TableId(pub usize);

impl Table {
    /// Builds and verifies a table. The primary key is taken from the column
    /// flagged `primary_key`.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Result<Table> {
        let name = name.into();

        let mut keys = columns
            .iter()
            .enumerate()
            .filter(|(_, column)| column.primary_key);

        let primary_key = keys.next().map(|(index, column)| PrimaryKey {
            column: index,
            auto_increment: column.auto_increment,
        });

        if keys.next().is_some() {
            return Err(Error::invalid_schema(format!(
                "table `{name}` declares more than one primary key"
            )));
        }

        let table = Table {
            id: TableId::next(),
            name,
            columns,
            primary_key,
        };
        table.verify()?;
        Ok(table)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }

    pub fn primary_key_column(&self) -> Option<&Column> {
        self.primary_key.map(|pk| &self.columns[pk.column])
    }

    /// Returns the key column, or an error naming the operation that needs
    /// it.
    pub fn require_primary_key(&self, operation: &str) -> Result<&Column> {
        self.primary_key_column().ok_or_else(|| {
            Error::invalid_schema(format!(
                "table `{}` has no primary key; required by {operation}",
                self.name
            ))
        })
    }

    pub fn is_auto_increment(&self) -> bool {
        self.primary_key.is_some_and(|pk| pk.auto_increment)
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = (&Column, &ForeignKey)> + '_ {
        self.columns
            .iter()
            .filter_map(|column| Some((column, column.foreign_key.as_ref()?)))
    }

    pub fn indices(&self) -> impl Iterator<Item = (&Column, &Index)> + '_ {
        self.columns
            .iter()
            .filter_map(|column| Some((column, column.index.as_ref()?)))
    }
}

impl TableId {
    pub(crate) fn next() -> TableId {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        TableId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Debug for TableId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "TableId({})", self.0)
    }
}
