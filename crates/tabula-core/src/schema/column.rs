use super::{ForeignKey, Index, Type};
use crate::stmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// The name of the column in the database.
    pub name: String,

    /// The logical type of values stored in the column.
    pub ty: stmt::Type,

    /// Whether or not the column is nullable
    pub nullable: bool,

    /// Maximum length of string, enum and binary columns.
    pub length: u32,

    /// Precision of decimal columns.
    pub precision: u32,

    /// Scale of decimal columns.
    pub scale: u32,

    /// When `true`, a string column is stored with the native JSON type.
    pub json: bool,

    /// When `true`, a UUID column is stored as 16 bytes instead of its
    /// 36 character text form.
    pub uuid_binary: bool,

    /// When `true`, the column carries a `UNIQUE` constraint.
    pub unique: bool,

    /// True if the column is the table's primary key
    pub primary_key: bool,

    /// True if the key value is produced by the key allocator.
    pub auto_increment: bool,

    pub foreign_key: Option<ForeignKey>,

    pub index: Option<Index>,
}

impl Column {
    pub const DEFAULT_LENGTH: u32 = 255;
    pub const DEFAULT_PRECISION: u32 = 15;
    pub const DEFAULT_SCALE: u32 = 6;

    /// A nullable column with default sizing and no constraints.
    pub fn new(name: impl Into<String>, ty: stmt::Type) -> Column {
        Column {
            name: name.into(),
            ty,
            nullable: true,
            length: Self::DEFAULT_LENGTH,
            precision: Self::DEFAULT_PRECISION,
            scale: Self::DEFAULT_SCALE,
            json: ty == stmt::Type::Json,
            uuid_binary: false,
            unique: false,
            primary_key: false,
            auto_increment: false,
            foreign_key: None,
            index: None,
        }
    }

    /// True when values cross the boundary as UUID text but are stored as
    /// bytes, so the SQL must convert in both directions.
    pub fn is_uuid_binary(&self) -> bool {
        self.ty == stmt::Type::Uuid && self.uuid_binary
    }

    /// The database storage type of the column.
    pub fn storage_ty(&self) -> Type {
        use stmt::Type::*;

        match self.ty {
            String if self.json => Type::Json,
            String | Enum => Type::VarChar(self.length),
            Json => Type::Json,
            Bool => Type::Boolean,
            I32 => Type::Integer,
            I64 | DateTime | Date => Type::BigInt,
            Decimal => Type::Decimal(self.precision, self.scale),
            Bytes => Type::VarBinary(self.length),
            Uuid if self.uuid_binary => Type::Binary(16),
            Uuid => Type::VarChar(36),
        }
    }
}
