use crate::Setup;

use std::sync::Once;
use tabula::{db::Builder, driver::Capability, Db, TableRef};

/// Per-test harness wrapping a [`Setup`].
pub struct DbTest {
    setup: Box<dyn Setup>,
}

impl DbTest {
    pub fn new(setup: impl Setup) -> Self {
        init_tracing();

        Self {
            setup: Box::new(setup),
        }
    }

    pub fn capability(&self) -> &'static Capability {
        self.setup.capability()
    }

    /// Opens a database with default options and creates `tables`.
    pub fn setup_db(&mut self, tables: &[TableRef]) -> Db {
        self.setup_db_with(&mut Db::builder(), tables)
    }

    /// Opens a database from `builder` and creates `tables`.
    pub fn setup_db_with(&mut self, builder: &mut Builder, tables: &[TableRef]) -> Db {
        let db = match self.setup.connect(builder) {
            Ok(db) => db,
            Err(err) => panic!("failed to connect; error={err}"),
        };

        if let Err(err) = db.create_tables(tables) {
            panic!("failed to create tables; error={err}");
        }

        db
    }

    /// Opens a database without creating any table.
    pub fn connect(&mut self) -> Db {
        self.setup_db(&[])
    }
}

fn init_tracing() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
