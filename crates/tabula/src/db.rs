mod builder;
pub use builder::Builder;

mod session;
pub use session::Session;

mod statement;
pub use statement::Statement;

use crate::{KeyAllocator, NullPolicy, Primitive, Record, Registry, Result, TableRef};

use std::{collections::HashMap, fmt, sync::Arc};
use tabula_core::{
    driver::{Capability, Driver},
    stmt, Error,
};
use tabula_sql::Generator;

/// A handle to a store.
///
/// Cheap to clone; clones share the registry, the statement cache and the
/// key counters. Each operation called directly on `Db` opens a connection
/// and releases it before returning. Use [`Db::connect`] to run several
/// operations on one connection.
#[derive(Clone)]
pub struct Db {
    shared: Arc<Shared>,
}

/// State shared between all `Db` clones.
pub(crate) struct Shared {
    pub(crate) driver: Box<dyn Driver>,
    pub(crate) registry: Registry,
    pub(crate) sql: Generator,
    pub(crate) keys: KeyAllocator,
    pub(crate) nulls: NullPolicy,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Opens a connection.
    pub fn connect(&self) -> Result<Session> {
        let conn = self.shared.driver.connect()?;
        Ok(Session::new(self.clone(), conn))
    }

    pub fn registry(&self) -> &Registry {
        &self.shared.registry
    }

    pub fn capability(&self) -> &'static Capability {
        self.shared.driver.capability()
    }

    pub fn driver(&self) -> &dyn Driver {
        &*self.shared.driver
    }

    pub fn null_policy(&self) -> NullPolicy {
        self.shared.nulls
    }

    pub(crate) fn shared(&self) -> &Shared {
        &self.shared
    }

    /// Seeds the key counters from the current maxima in the store.
    pub fn preload(&self, tables: &[TableRef]) -> Result<()> {
        self.connect()?.preload(tables)
    }

    /// Returns the next primary key for `T`.
    pub fn generate_key<T: Record>(&self) -> Result<T::Key> {
        let table = self.shared.registry.table::<T>()?;
        let key = self.shared.keys.generate(&table)?;

        let value = match T::Key::TYPE {
            stmt::Type::I32 => match i32::try_from(key) {
                Ok(key) => stmt::Value::I32(key),
                Err(_) => {
                    return Err(Error::invalid_schema(format!(
                        "key space of table `{}` is exhausted",
                        table.name
                    )))
                }
            },
            _ => stmt::Value::I64(key),
        };

        T::Key::load(value)
    }

    /// Resets the key counter of `T` to zero.
    pub fn reset_key<T: Record>(&self) -> Result<()> {
        let table = self.shared.registry.table::<T>()?;
        self.shared.keys.reset(&table);
        Ok(())
    }

    /// Returns the primary key of `record`.
    pub fn primary_key<T: Record>(&self, record: &T) -> Result<T::Key> {
        self.shared.registry.primary_key(record)
    }

    pub fn get<T: Record>(&self, key: T::Key) -> Result<Option<T>> {
        self.connect()?.get(key)
    }

    pub fn get_all<T: Record>(&self) -> Result<Vec<T>> {
        self.connect()?.get_all()
    }

    pub fn get_all_into<T: Record>(&self, records: &mut HashMap<T::Key, T>) -> Result<()> {
        self.connect()?.get_all_into(records)
    }

    pub fn insert<T: Record>(&self, record: &T) -> Result<()> {
        self.connect()?.insert(record)
    }

    pub fn insert_batch<T: Record>(&self, batch_size: usize, records: &[T]) -> Result<()> {
        self.connect()?.insert_batch(batch_size, records)
    }

    pub fn update<T: Record>(&self, record: &T) -> Result<u64> {
        self.connect()?.update(record)
    }

    pub fn delete<T: Record>(&self, record: &T) -> Result<u64> {
        self.connect()?.delete(record)
    }

    pub fn delete_by_key<T: Record>(&self, key: T::Key) -> Result<u64> {
        self.connect()?.delete_by_key::<T>(key)
    }

    pub fn delete_all<T: Record>(&self) -> Result<u64> {
        self.connect()?.delete_all::<T>()
    }

    pub fn truncate(&self, tables: &[TableRef]) -> Result<()> {
        self.connect()?.truncate(tables)
    }

    pub fn create_tables(&self, tables: &[TableRef]) -> Result<()> {
        self.connect()?.create_tables(tables)
    }

    pub fn drop_tables(&self, tables: &[TableRef]) -> Result<()> {
        self.connect()?.drop_tables(tables)
    }
}

impl fmt::Debug for Db {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Db")
            .field("driver", &self.shared.driver)
            .field("nulls", &self.shared.nulls)
            .finish()
    }
}
