use crate::Result;

pub use tabula_core::driver::{Capability, ConnectOptions, Connection, Driver};
use tabula_core::Error;

use url::Url;

/// Picks the built-in driver matching the URL scheme.
pub(crate) fn from_url(url: &str) -> Result<Box<dyn Driver>> {
    let parsed = Url::parse(url)
        .map_err(|e| Error::invalid_connection_url(format!("{e}; url={url}")))?;

    match parsed.scheme() {
        "mysql" => connect_mysql(url),
        "sqlite" => connect_sqlite(url),
        scheme => Err(Error::invalid_connection_url(format!(
            "unsupported database; scheme={scheme}; url={url}"
        ))),
    }
}

#[cfg(feature = "mysql")]
fn connect_mysql(url: &str) -> Result<Box<dyn Driver>> {
    Ok(Box::new(tabula_driver_mysql::MySql::new(url)?))
}

#[cfg(not(feature = "mysql"))]
fn connect_mysql(_url: &str) -> Result<Box<dyn Driver>> {
    Err(Error::invalid_connection_url("`mysql` feature not enabled"))
}

#[cfg(feature = "sqlite")]
fn connect_sqlite(url: &str) -> Result<Box<dyn Driver>> {
    Ok(Box::new(tabula_driver_sqlite::Sqlite::new(url)?))
}

#[cfg(not(feature = "sqlite"))]
fn connect_sqlite(_url: &str) -> Result<Box<dyn Driver>> {
    Err(Error::invalid_connection_url("`sqlite` feature not enabled"))
}
