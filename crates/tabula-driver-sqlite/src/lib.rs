mod functions;

mod value;
pub(crate) use value::Value;

use rusqlite::{Connection as RusqliteConnection, OpenFlags};
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};
use tabula_core::{
    driver::{Capability, Driver},
    stmt, Error, Result,
};
use tracing::debug;
use url::Url;

#[derive(Debug)]
pub enum Sqlite {
    File(PathBuf),
    InMemory(InMemory),
}

/// A named in-memory database shared by every connection the driver opens.
///
/// SQLite discards a shared in-memory database when its last connection
/// closes; the anchor connection keeps it alive for the life of the driver.
#[derive(Debug)]
pub struct InMemory {
    uri: String,
    _anchor: Mutex<RusqliteConnection>,
}

impl Sqlite {
    /// Create a new SQLite driver with an arbitrary connection URL
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str)
            .map_err(|e| Error::invalid_connection_url(format!("{e}; url={url_str}")))?;

        if url.scheme() != "sqlite" {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `sqlite` scheme; url={url_str}"
            )));
        }

        match url.path() {
            ":memory:" => Self::in_memory(),
            "" => Err(Error::invalid_connection_url(format!(
                "missing database path in connection URL; url={url_str}"
            ))),
            path => Ok(Self::open(path)),
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Result<Self> {
        static NEXT: AtomicUsize = AtomicUsize::new(0);

        let uri = format!(
            "file:tabula-mem-{}-{}?mode=memory&cache=shared",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::Relaxed)
        );
        let anchor = Connection::open_uri(&uri)?;

        Ok(Self::InMemory(InMemory {
            uri,
            _anchor: Mutex::new(anchor.connection),
        }))
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }
}

impl Driver for Sqlite {
    fn url(&self) -> Cow<'_, str> {
        match self {
            Sqlite::InMemory(_) => Cow::Borrowed("sqlite::memory:"),
            Sqlite::File(path) => Cow::Owned(format!("sqlite:{}", path.display())),
        }
    }

    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }

    fn connect(&self) -> Result<Box<dyn tabula_core::Connection>> {
        let connection = match self {
            Sqlite::File(path) => Connection::open(path)?,
            Sqlite::InMemory(memory) => Connection::open_uri(&memory.uri)?,
        };
        Ok(Box::new(connection))
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: RusqliteConnection,
}

impl Connection {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection =
            RusqliteConnection::open(path).map_err(Error::driver_operation_failed)?;
        Self::init(connection)
    }

    fn open_uri(uri: &str) -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let connection = RusqliteConnection::open_with_flags(uri, flags)
            .map_err(Error::driver_operation_failed)?;
        Self::init(connection)
    }

    fn init(connection: RusqliteConnection) -> Result<Self> {
        connection
            .execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(Error::driver_operation_failed)?;
        functions::register(&connection).map_err(Error::driver_operation_failed)?;

        Ok(Self { connection })
    }

    fn params<'a>(params: &'a [stmt::Value]) -> impl Iterator<Item = Value<'a>> {
        params.iter().map(Value)
    }
}

impl tabula_core::driver::Connection for Connection {
    fn execute(&mut self, sql: &str) -> Result<()> {
        self.connection
            .execute_batch(sql)
            .map_err(Error::driver_operation_failed)
    }

    fn exec(&mut self, sql: &str, params: &[stmt::Value]) -> Result<u64> {
        let mut stmt = self
            .connection
            .prepare_cached(sql)
            .map_err(Error::driver_operation_failed)?;

        let count = stmt
            .execute(rusqlite::params_from_iter(Self::params(params)))
            .map_err(Error::driver_operation_failed)?;

        Ok(count as u64)
    }

    fn exec_batch(&mut self, sql: &str, batch: &[Vec<stmt::Value>]) -> Result<u64> {
        let mut stmt = self
            .connection
            .prepare_cached(sql)
            .map_err(Error::driver_operation_failed)?;

        let mut count = 0;
        for params in batch {
            count += stmt
                .execute(rusqlite::params_from_iter(Self::params(params)))
                .map_err(Error::driver_operation_failed)? as u64;
        }

        debug!("sqlite batch; rows={}; affected={count}", batch.len());
        Ok(count)
    }

    fn query(&mut self, sql: &str, params: &[stmt::Value]) -> Result<Vec<stmt::Row>> {
        let mut stmt = self
            .connection
            .prepare_cached(sql)
            .map_err(Error::driver_operation_failed)?;

        let width = stmt.column_count();
        let columns: stmt::Columns = Arc::new(
            stmt.column_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        );

        let mut rows = stmt
            .query(rusqlite::params_from_iter(Self::params(params)))
            .map_err(Error::driver_operation_failed)?;

        let mut ret = vec![];

        while let Some(row) = rows.next().map_err(Error::driver_operation_failed)? {
            let values = (0..width)
                .map(|index| row.get_ref(index).map(Value::load))
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(Error::driver_operation_failed)?;

            ret.push(stmt::Row::new(columns.clone(), values));
        }

        Ok(ret)
    }
}
