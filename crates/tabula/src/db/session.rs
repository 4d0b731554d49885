use super::{Db, Statement};
use crate::{Model, Primitive, Record, Result, TableRef};

use std::{collections::HashMap, sync::Arc};
use tabula_core::{driver::Connection, schema::Table, stmt, Error};
use tracing::debug;

/// A connection held by the caller.
///
/// Every operation runs on the same connection, so statements issued
/// through [`Session::execute`] (for example `BEGIN`) apply to the
/// operations that follow. The connection is closed when the session is
/// dropped.
#[derive(Debug)]
pub struct Session {
    db: Db,
    conn: Box<dyn Connection>,
}

impl Session {
    pub(crate) fn new(db: Db, conn: Box<dyn Connection>) -> Session {
        Session { db, conn }
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    /// Runs raw SQL that takes no parameters.
    pub fn execute(&mut self, sql: &str) -> Result<()> {
        debug!("execute; sql={sql}");
        self.conn.execute(sql)
    }

    /// Prepares `sql` for binding and execution.
    pub fn prepare(&mut self, sql: impl Into<Arc<str>>) -> Statement<'_> {
        Statement::new(&mut *self.conn, sql.into())
    }

    /// Loads the record with the given key.
    pub fn get<T: Record>(&mut self, key: T::Key) -> Result<Option<T>> {
        let model = self.model::<T>()?;
        let sql = self.db.shared().sql.select_by_key(model.table())?;

        let rows = self.prepare(sql).bind(1, key.to_value())?.query()?;

        match rows.first() {
            Some(row) => Ok(Some(model.load(row, self.db.null_policy())?)),
            None => Ok(None),
        }
    }

    /// Loads every record of `T`.
    pub fn get_all<T: Record>(&mut self) -> Result<Vec<T>> {
        let model = self.model::<T>()?;
        let sql = self.db.shared().sql.select_all(model.table())?;
        let nulls = self.db.null_policy();

        let rows = self.prepare(sql).query()?;
        rows.iter().map(|row| model.load(row, nulls)).collect()
    }

    /// Loads every record of `T` into `records`, keyed by primary key.
    pub fn get_all_into<T: Record>(&mut self, records: &mut HashMap<T::Key, T>) -> Result<()> {
        let model = self.model::<T>()?;
        model.table().require_primary_key("get_all_into")?;

        for record in self.get_all::<T>()? {
            records.insert(model.primary_key(&record)?, record);
        }

        Ok(())
    }

    pub fn insert<T: Record>(&mut self, record: &T) -> Result<()> {
        let model = self.model::<T>()?;
        let sql = self.db.shared().sql.insert(model.table())?;

        self.prepare(sql).bind_all(model.values(record)).execute()?;
        Ok(())
    }

    /// Inserts `records`, sending them to the store `batch_size` rows at a
    /// time.
    ///
    /// A failed flush aborts the call. Rows sent by earlier flushes are left
    /// as the store has them.
    pub fn insert_batch<T: Record>(&mut self, batch_size: usize, records: &[T]) -> Result<()> {
        if batch_size < 1 {
            return Err(Error::invalid_argument(format!(
                "batch size must be at least 1; got {batch_size}"
            )));
        }

        if records.is_empty() {
            return Ok(());
        }

        let model = self.model::<T>()?;
        let sql = self.db.shared().sql.insert(model.table())?;
        let mut stmt = self.prepare(sql);

        for chunk in records.chunks(batch_size) {
            for record in chunk {
                stmt.bind_all(model.values(record)).add_batch();
            }
            stmt.execute_batch()?;
        }

        Ok(())
    }

    /// Writes every non-key column of `record`. Returns the number of
    /// updated rows.
    pub fn update<T: Record>(&mut self, record: &T) -> Result<u64> {
        let model = self.model::<T>()?;
        let sql = self.db.shared().sql.update(model.table())?;
        let values = model.update_values(record)?;

        self.prepare(sql).bind_all(values).execute()
    }

    pub fn delete<T: Record>(&mut self, record: &T) -> Result<u64> {
        let model = self.model::<T>()?;
        let key = model.key_value(record, "delete")?;
        self.delete_value(model.table(), key)
    }

    pub fn delete_by_key<T: Record>(&mut self, key: T::Key) -> Result<u64> {
        let model = self.model::<T>()?;
        self.delete_value(model.table(), key.to_value())
    }

    pub fn delete_all<T: Record>(&mut self) -> Result<u64> {
        let model = self.model::<T>()?;
        let sql = self.db.shared().sql.delete_all(model.table())?;
        self.prepare(sql).execute()
    }

    /// Empties the tables and resets their key counters.
    pub fn truncate(&mut self, tables: &[TableRef]) -> Result<()> {
        for table in self.resolve(tables)? {
            let sql = self.db.shared().sql.truncate(&table)?;
            self.prepare(sql).execute()?;

            if table.is_auto_increment() {
                self.db.shared().keys.reset(&table);
            }
        }

        Ok(())
    }

    /// Creates the tables and their indices, dropping any existing table of
    /// the same name first.
    ///
    /// Tables are dropped in reverse order and created in the given order,
    /// so referenced tables should be listed before the tables referencing
    /// them.
    pub fn create_tables(&mut self, tables: &[TableRef]) -> Result<()> {
        let tables = self.resolve(tables)?;
        let sql = &self.db.shared().sql;

        let drops = tables
            .iter()
            .rev()
            .map(|table| sql.drop_table(table, true))
            .collect::<Result<Vec<_>>>()?;

        let mut creates = Vec::with_capacity(tables.len());
        for table in &tables {
            creates.push(sql.create_table(table)?);
            creates.extend(sql.create_indices(table)?);
        }

        for statement in drops.iter().chain(&creates) {
            self.execute(statement)?;
        }

        Ok(())
    }

    /// Drops the tables, in reverse order.
    pub fn drop_tables(&mut self, tables: &[TableRef]) -> Result<()> {
        for table in self.resolve(tables)?.iter().rev() {
            let sql = self.db.shared().sql.drop_table(table, false)?;
            self.execute(&sql)?;
        }

        Ok(())
    }

    /// Seeds the key counters of the auto-increment tables from the store.
    /// Other tables are skipped.
    pub fn preload(&mut self, tables: &[TableRef]) -> Result<()> {
        for table in self.resolve(tables)? {
            if !table.is_auto_increment() {
                continue;
            }

            let sql = self.db.shared().sql.select_max_key(&table)?;
            let rows = self.prepare(sql).query()?;

            let max = match rows.first() {
                Some(row) => row.get_index(0, &stmt::Type::I64)?.as_i64().unwrap_or(0),
                None => 0,
            };

            debug!("preload; table={}; max={max}", table.name);
            self.db.shared().keys.seed(&table, max);
        }

        Ok(())
    }

    fn model<T: Record>(&self) -> Result<Arc<Model<T>>> {
        self.db.registry().describe::<T>()
    }

    fn resolve(&self, tables: &[TableRef]) -> Result<Vec<Arc<Table>>> {
        tables
            .iter()
            .map(|table| table.table(self.db.registry()))
            .collect()
    }

    fn delete_value(&mut self, table: &Table, key: stmt::Value) -> Result<u64> {
        let sql = self.db.shared().sql.delete(table)?;
        self.prepare(sql).bind(1, key)?.execute()
    }
}
