use crate::{model::TableBuilder, Primitive, Registry, Result};

use std::{any::TypeId, fmt, hash::Hash, sync::Arc};
use tabula_core::schema::Table;

/// A type stored as one row of one table.
///
/// The mapping is declared once, in [`Record::define`]:
///
/// ```
/// use tabula::{Record, TableBuilder};
///
/// #[derive(Debug, Default, Clone, PartialEq)]
/// struct Book {
///     id: i32,
///     title: String,
///     subtitle: Option<String>,
/// }
///
/// impl Record for Book {
///     type Key = i32;
///
///     fn define(table: &mut TableBuilder<Self>) {
///         table.name("books").default_with(Book::default);
///         table.column("id", |r| &r.id, |r| &mut r.id).auto_increment();
///         table.column("title", |r| &r.title, |r| &mut r.title).length(100);
///         table.column("subtitle", |r| &r.subtitle, |r| &mut r.subtitle);
///     }
/// }
/// ```
pub trait Record: Sized + 'static {
    /// Type of the primary key. Tables without a primary key may use any
    /// primitive; operations that need a key fail for them.
    type Key: Primitive + Eq + Hash + Clone;

    fn define(table: &mut TableBuilder<Self>);
}

/// Refers to the table of a record type without naming the type
/// statically. Used by operations that act on several tables at once.
#[derive(Clone, Copy)]
pub struct TableRef {
    type_id: TypeId,
    type_name: &'static str,
    table: fn(&Registry) -> Result<Arc<Table>>,
}

impl TableRef {
    pub fn of<T: Record>() -> TableRef {
        TableRef {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            table: |registry| registry.table::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Describes the record type, returning its table.
    pub fn table(&self, registry: &Registry) -> Result<Arc<Table>> {
        (self.table)(registry)
    }
}

impl fmt::Debug for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TableRef").field(&self.type_name).finish()
    }
}

/// Builds a `[TableRef; N]` from a list of record types.
///
/// ```ignore
/// db.create_tables(&tables![Author, Book])?;
/// ```
#[macro_export]
macro_rules! tables {
    ( $( $ty:ty ),* $(,)? ) => {
        [ $( $crate::TableRef::of::<$ty>() ),* ]
    };
}
