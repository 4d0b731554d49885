/// A single column index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    /// Index name, unique within the table
    pub name: String,

    /// When `true`, indexed entries are unique
    pub unique: bool,
}
