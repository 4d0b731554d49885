use super::Serializer;

use tabula_core::driver::Capability;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Flavor {
    Sqlite,
    Mysql,
}

impl Serializer {
    pub fn sqlite() -> Serializer {
        Serializer::for_capability(&Capability::SQLITE)
    }

    pub fn mysql() -> Serializer {
        Serializer::for_capability(&Capability::MYSQL)
    }

    /// Picks the flavor and statement forms matching a driver's capability.
    pub fn for_capability(capability: &Capability) -> Serializer {
        let flavor = if capability.is_sqlite() {
            Flavor::Sqlite
        } else {
            Flavor::Mysql
        };

        Serializer {
            flavor,
            truncate_table: capability.truncate_table,
        }
    }
}
