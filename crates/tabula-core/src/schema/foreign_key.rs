use std::fmt;

/// A `FOREIGN KEY` constraint attached to a column.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    /// Name of the referenced table
    pub table: String,

    /// Name of the referenced column
    pub column: String,

    pub on_delete: ReferenceOption,

    pub on_update: ReferenceOption,
}

/// Referential action of a foreign key.
///
/// `None` omits the clause and leaves the store's default in place.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceOption {
    #[default]
    None,
    Restrict,
    Cascade,
    SetNull,
    NoAction,
}

impl ForeignKey {
    /// Column referenced when none is named.
    pub const DEFAULT_COLUMN: &'static str = "id";
}

impl ReferenceOption {
    pub fn is_none(&self) -> bool {
        matches!(self, ReferenceOption::None)
    }

    /// The SQL keyword for the action; `None` has no keyword.
    pub fn as_sql(&self) -> Option<&'static str> {
        match self {
            ReferenceOption::None => None,
            ReferenceOption::Restrict => Some("RESTRICT"),
            ReferenceOption::Cascade => Some("CASCADE"),
            ReferenceOption::SetNull => Some("SET NULL"),
            ReferenceOption::NoAction => Some("NO ACTION"),
        }
    }
}

impl fmt::Display for ReferenceOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql().unwrap_or("NONE"))
    }
}
