#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimaryKey {
    /// Position of the key column in the table
    pub column: usize,

    /// When `true`, key values come from the key allocator.
    pub auto_increment: bool,
}
