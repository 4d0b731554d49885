mod capability;
pub use capability::Capability;

mod connect_options;
pub use connect_options::ConnectOptions;

use crate::{stmt, Result};

use std::{borrow::Cow, fmt::Debug};

/// A store that tabula can open connections to.
pub trait Driver: Debug + Send + Sync + 'static {
    /// Get the URL this driver is connecting to.
    fn url(&self) -> Cow<'_, str>;

    /// Describes the driver's capability, which informs the SQL flavor.
    fn capability(&self) -> &'static Capability;

    /// Creates a new connection to the database.
    ///
    /// The connection is closed when the returned value is dropped.
    fn connect(&self) -> Result<Box<dyn Connection>>;
}

/// An open connection to a store.
///
/// All statements use `?` positional placeholders. Parameters are bound in
/// the canonical value representation of their logical type.
pub trait Connection: Debug + Send + 'static {
    /// Runs a statement that takes no parameters and returns no rows.
    fn execute(&mut self, sql: &str) -> Result<()>;

    /// Runs a statement once, returning the number of affected rows.
    fn exec(&mut self, sql: &str, params: &[stmt::Value]) -> Result<u64>;

    /// Runs a statement once per parameter set, returning the total number of
    /// affected rows.
    fn exec_batch(&mut self, sql: &str, batch: &[Vec<stmt::Value>]) -> Result<u64> {
        let mut count = 0;
        for params in batch {
            count += self.exec(sql, params)?;
        }
        Ok(count)
    }

    /// Runs a query, returning all rows.
    fn query(&mut self, sql: &str, params: &[stmt::Value]) -> Result<Vec<stmt::Row>>;
}
