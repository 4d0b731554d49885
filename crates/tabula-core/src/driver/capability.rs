#[derive(Debug)]
pub struct Capability {
    /// Short name of the SQL dialect
    pub flavor: &'static str,

    /// Supports `TRUNCATE TABLE`. When false, truncation falls back to an
    /// unconditional `DELETE`.
    pub truncate_table: bool,
}

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        flavor: "sqlite",
        truncate_table: false,
    };

    /// MySQL capabilities
    pub const MYSQL: Self = Self {
        flavor: "mysql",
        truncate_table: true,
    };

    pub fn is_sqlite(&self) -> bool {
        self.flavor == Self::SQLITE.flavor
    }

    pub fn is_mysql(&self) -> bool {
        self.flavor == Self::MYSQL.flavor
    }
}
