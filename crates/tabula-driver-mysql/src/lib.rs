mod value;
pub(crate) use value::Value;

use mysql_async::{
    prelude::{Queryable, ToValue},
    Conn, Opts, OptsBuilder, Params, SslOpts,
};
use std::{borrow::Cow, sync::Arc};
use tabula_core::{
    driver::{Capability, ConnectOptions, Driver},
    stmt, Error, Result,
};
use tokio::runtime::Runtime;
use tracing::debug;

/// A MySQL server reached over TCP.
///
/// Each connection owns a single-threaded tokio runtime and blocks on it, so
/// callers need no runtime of their own.
#[derive(Debug)]
pub struct MySql {
    url: String,
    opts: Opts,
}

impl MySql {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let options = ConnectOptions::from_url(&url.into())?;
        Self::with_options(&options)
    }

    pub fn with_options(options: &ConnectOptions) -> Result<Self> {
        let mut init = vec![format!("SET NAMES {}", options.charset)];
        if let Some(timezone) = &options.timezone {
            init.push(format!("SET time_zone = '{}'", timezone.replace('\'', "''")));
        }

        let mut builder = OptsBuilder::default()
            .ip_or_hostname(options.host.clone())
            .tcp_port(options.port)
            .db_name(Some(options.database.clone()))
            .user(options.user.clone())
            .pass(options.password.clone())
            .client_found_rows(true)
            .init(init);

        if options.use_ssl {
            builder = builder.ssl_opts(SslOpts::default());
        }

        Ok(Self {
            url: options.to_url()?,
            opts: builder.into(),
        })
    }
}

impl Driver for MySql {
    fn url(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.url)
    }

    fn capability(&self) -> &'static Capability {
        &Capability::MYSQL
    }

    fn connect(&self) -> Result<Box<dyn tabula_core::Connection>> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::driver_operation_failed)?;

        let conn = runtime
            .block_on(Conn::new(self.opts.clone()))
            .map_err(Error::driver_operation_failed)?;

        Ok(Box::new(Connection {
            runtime,
            conn: Some(conn),
        }))
    }
}

#[derive(Debug)]
pub struct Connection {
    runtime: Runtime,

    /// Taken on drop so the connection can be closed on its runtime.
    conn: Option<Conn>,
}

impl Connection {
    fn conn(&mut self) -> Result<(&Runtime, &mut Conn)> {
        match &mut self.conn {
            Some(conn) => Ok((&self.runtime, conn)),
            None => Err(Error::invalid_argument("connection is closed")),
        }
    }

    fn params(params: &[stmt::Value]) -> Params {
        params
            .iter()
            .map(|value| Value(value).to_value())
            .collect::<Vec<_>>()
            .into()
    }
}

impl tabula_core::driver::Connection for Connection {
    fn execute(&mut self, sql: &str) -> Result<()> {
        let (runtime, conn) = self.conn()?;

        runtime
            .block_on(conn.query_drop(sql))
            .map_err(Error::driver_operation_failed)
    }

    fn exec(&mut self, sql: &str, params: &[stmt::Value]) -> Result<u64> {
        let (runtime, conn) = self.conn()?;

        runtime.block_on(async {
            conn.exec_drop(sql, Self::params(params))
                .await
                .map_err(Error::driver_operation_failed)?;
            Ok::<_, Error>(conn.affected_rows())
        })
    }

    fn exec_batch(&mut self, sql: &str, batch: &[Vec<stmt::Value>]) -> Result<u64> {
        let (runtime, conn) = self.conn()?;

        let count = runtime.block_on(async {
            let statement = conn.prep(sql).await.map_err(Error::driver_operation_failed)?;

            let mut count = 0;
            for params in batch {
                conn.exec_drop(&statement, Self::params(params))
                    .await
                    .map_err(Error::driver_operation_failed)?;
                count += conn.affected_rows();
            }
            Ok::<_, Error>(count)
        })?;

        debug!("mysql batch; rows={}; affected={count}", batch.len());
        Ok(count)
    }

    fn query(&mut self, sql: &str, params: &[stmt::Value]) -> Result<Vec<stmt::Row>> {
        let (runtime, conn) = self.conn()?;

        runtime.block_on(async {
            let statement = conn.prep(sql).await.map_err(Error::driver_operation_failed)?;

            let columns: stmt::Columns = Arc::new(
                statement
                    .columns()
                    .iter()
                    .map(|column| column.name_str().into_owned())
                    .collect(),
            );

            let rows: Vec<mysql_async::Row> = conn
                .exec(&statement, Self::params(params))
                .await
                .map_err(Error::driver_operation_failed)?;

            let rows: Vec<stmt::Row> = rows
                .into_iter()
                .map(|mut row| {
                    let values = (0..row.len())
                        .map(|index| {
                            let value = row.take(index).unwrap_or(mysql_async::Value::NULL);
                            Value::load(value)
                        })
                        .collect();
                    stmt::Row::new(columns.clone(), values)
                })
                .collect();

            Ok::<_, Error>(rows)
        })
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err(err) = self.runtime.block_on(conn.disconnect()) {
                debug!("mysql disconnect failed; err={err}");
            }
        }
    }
}
