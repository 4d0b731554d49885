use tabula::{db::Builder, driver::Capability, stmt, Db};

use crate::Setup;

/// Connects to the server named by `TABULA_TEST_MYSQL_URL` and drops every
/// table left in the database by earlier tests.
///
/// Table names are fixed by the record definitions, so tests sharing one
/// database must run with `--test-threads=1`.
#[derive(Debug)]
pub struct SetupMySql {
    url: String,
}

impl SetupMySql {
    pub fn new() -> Self {
        let url = std::env::var("TABULA_TEST_MYSQL_URL")
            .unwrap_or_else(|_| "mysql://root@localhost:3306/tabula_test".to_string());

        Self { url }
    }
}

impl Default for SetupMySql {
    fn default() -> Self {
        Self::new()
    }
}

impl Setup for SetupMySql {
    fn connect(&self, builder: &mut Builder) -> tabula::Result<Db> {
        let db = builder.connect(&self.url)?;
        reset(&db)?;
        Ok(db)
    }

    fn capability(&self) -> &'static Capability {
        &Capability::MYSQL
    }
}

fn reset(db: &Db) -> tabula::Result<()> {
    let mut session = db.connect()?;

    let rows = session
        .prepare("SELECT table_name FROM information_schema.tables WHERE table_schema = DATABASE()")
        .query()?;

    session.execute("SET FOREIGN_KEY_CHECKS = 0")?;
    for row in rows {
        let name = row.get_index(0, &stmt::Type::String)?;
        if let Some(name) = name.as_str() {
            session.execute(&format!("DROP TABLE IF EXISTS `{name}`"))?;
        }
    }
    session.execute("SET FOREIGN_KEY_CHECKS = 1")
}
