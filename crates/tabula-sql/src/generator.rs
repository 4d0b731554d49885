use crate::Serializer;

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};
use tabula_core::{
    schema::{Table, TableId},
    Result,
};

/// Statements generated for a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    SelectAll,
    SelectByKey,
    Insert,
    Update,
    Delete,
    DeleteAll,
    Truncate,
    SelectMaxKey,
    CreateTable,

    /// Index on the column at the given position
    CreateIndex(usize),

    DropTable,
    DropTableIfExists,
}

/// Generates SQL for tables and memoizes it per table and statement kind.
///
/// Repeated requests return the same `Arc<str>`. When two threads race to
/// generate the same statement, both compute it and the first insert wins;
/// every caller observes the inserted string.
#[derive(Debug)]
pub struct Generator {
    serializer: Serializer,
    cache: RwLock<HashMap<(TableId, StatementKind), Arc<str>>>,
}

impl Generator {
    pub fn new(serializer: Serializer) -> Generator {
        Generator {
            serializer,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn serializer(&self) -> &Serializer {
        &self.serializer
    }

    pub fn select_all(&self, table: &Table) -> Result<Arc<str>> {
        self.get_or_generate(table, StatementKind::SelectAll, |s, t| s.select_all(t))
    }

    pub fn select_by_key(&self, table: &Table) -> Result<Arc<str>> {
        self.get_or_generate(table, StatementKind::SelectByKey, |s, t| {
            s.select_by_key(t)
        })
    }

    pub fn insert(&self, table: &Table) -> Result<Arc<str>> {
        self.get_or_generate(table, StatementKind::Insert, |s, t| s.insert(t))
    }

    pub fn update(&self, table: &Table) -> Result<Arc<str>> {
        self.get_or_generate(table, StatementKind::Update, |s, t| s.update(t))
    }

    pub fn delete(&self, table: &Table) -> Result<Arc<str>> {
        self.get_or_generate(table, StatementKind::Delete, |s, t| s.delete(t))
    }

    pub fn delete_all(&self, table: &Table) -> Result<Arc<str>> {
        self.get_or_generate(table, StatementKind::DeleteAll, |s, t| s.delete_all(t))
    }

    pub fn truncate(&self, table: &Table) -> Result<Arc<str>> {
        self.get_or_generate(table, StatementKind::Truncate, |s, t| s.truncate(t))
    }

    pub fn select_max_key(&self, table: &Table) -> Result<Arc<str>> {
        self.get_or_generate(table, StatementKind::SelectMaxKey, |s, t| {
            s.select_max_key(t)
        })
    }

    pub fn create_table(&self, table: &Table) -> Result<Arc<str>> {
        self.get_or_generate(table, StatementKind::CreateTable, |s, t| {
            s.create_table(t)
        })
    }

    /// One CREATE INDEX statement per indexed column, in column order.
    pub fn create_indices(&self, table: &Table) -> Result<Vec<Arc<str>>> {
        table
            .columns
            .iter()
            .enumerate()
            .filter_map(|(position, column)| Some((position, column, column.index.as_ref()?)))
            .map(|(position, column, index)| {
                self.get_or_generate(table, StatementKind::CreateIndex(position), |s, t| {
                    Ok(s.create_index(t, column, index))
                })
            })
            .collect()
    }

    pub fn drop_table(&self, table: &Table, if_exists: bool) -> Result<Arc<str>> {
        let kind = if if_exists {
            StatementKind::DropTableIfExists
        } else {
            StatementKind::DropTable
        };

        self.get_or_generate(table, kind, |s, t| Ok(s.drop_table(t, if_exists)))
    }

    /// Number of cached statements
    pub fn len(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get_or_generate(
        &self,
        table: &Table,
        kind: StatementKind,
        generate: impl FnOnce(&Serializer, &Table) -> Result<String>,
    ) -> Result<Arc<str>> {
        let key = (table.id, kind);

        if let Some(sql) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(sql.clone());
        }

        let sql: Arc<str> = generate(&self.serializer, table)?.into();

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Ok(cache.entry(key).or_insert(sql).clone())
    }
}
