/// Database storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// `VARCHAR(n)`
    VarChar(u32),

    /// Native JSON document
    Json,

    Boolean,

    /// 32-bit integer
    Integer,

    /// 64-bit integer
    BigInt,

    /// `DECIMAL(precision, scale)`
    Decimal(u32, u32),

    /// `VARBINARY(n)`
    VarBinary(u32),

    /// Fixed length `BINARY(n)`
    Binary(u32),
}
