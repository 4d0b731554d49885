use super::{Db, Shared};
use crate::{driver, KeyAllocator, NullPolicy, Registry, Result};

use std::sync::Arc;
use tabula_core::driver::Driver;
use tabula_sql::{Generator, Serializer};

/// Configures and opens a [`Db`].
#[derive(Debug, Default)]
pub struct Builder {
    nulls: NullPolicy,
}

impl Builder {
    /// When `true`, reading `NULL` into a non-`Option` field fails instead
    /// of producing zero or `false`.
    pub fn strict_nulls(&mut self, strict: bool) -> &mut Self {
        self.nulls = if strict {
            NullPolicy::Strict
        } else {
            NullPolicy::Coerce
        };
        self
    }

    /// Opens a `Db` with the built-in driver matching the URL scheme.
    ///
    /// Supported schemes are `sqlite` (`sqlite::memory:`, `sqlite:<path>`)
    /// and `mysql`, each behind the feature of the same name.
    pub fn connect(&mut self, url: &str) -> Result<Db> {
        let driver = driver::from_url(url)?;
        Ok(self.build_boxed(driver))
    }

    pub fn build(&mut self, driver: impl Driver) -> Db {
        self.build_boxed(Box::new(driver))
    }

    fn build_boxed(&mut self, driver: Box<dyn Driver>) -> Db {
        let sql = Generator::new(Serializer::for_capability(driver.capability()));

        tracing::debug!(url = %driver.url(), nulls = ?self.nulls, "opening db");

        Db {
            shared: Arc::new(Shared {
                driver,
                registry: Registry::new(),
                sql,
                keys: KeyAllocator::new(),
                nulls: self.nulls,
            }),
        }
    }
}
