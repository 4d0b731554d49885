use super::{Accessor, Args};
use crate::{primitive::load_column, Primitive, Record, Result, TableRef};

use tabula_core::{
    schema::{Column, Index, ReferenceOption},
    stmt,
};

/// Collects the declared mapping of a record type.
///
/// Passed to [`Record::define`]. Declaration mistakes are recorded and
/// reported when the type is first described, not here.
pub struct TableBuilder<T> {
    pub(super) name: Option<String>,
    pub(super) columns: Vec<ColumnDef<T>>,
    pub(super) builders: Vec<BuilderDef<T>>,
    pub(super) defaults: Vec<fn() -> T>,
    pub(super) errors: Vec<String>,
}

/// Configures the column most recently added to a [`TableBuilder`].
pub struct ColumnBuilder<'a, T> {
    def: &'a mut ColumnDef<T>,
    errors: &'a mut Vec<String>,
}

pub(super) struct ColumnDef<T> {
    pub(super) column: Column,
    pub(super) accessor: Accessor<T>,
    pub(super) references: Option<References>,
}

/// A foreign key before the referenced table is resolved.
pub(super) struct References {
    pub(super) target: TableRef,
    pub(super) column: String,
    pub(super) on_delete: ReferenceOption,
    pub(super) on_update: ReferenceOption,
}

pub(super) struct BuilderDef<T> {
    pub(super) params: Vec<String>,
    pub(super) build: super::BuildFn<T>,
}

impl<T: Record> TableBuilder<T> {
    pub(crate) fn new() -> TableBuilder<T> {
        TableBuilder {
            name: None,
            columns: vec![],
            builders: vec![],
            defaults: vec![],
            errors: vec![],
        }
    }

    /// Sets the table name.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        if self.name.is_some() {
            self.errors.push("table name declared more than once".to_string());
        }
        self.name = Some(name.into());
        self
    }

    /// Maps a field to a column.
    ///
    /// `get` and `set` project the field out of the record. Columns are
    /// stored in the order they are declared. The column is nullable when
    /// the field type is an `Option`.
    pub fn column<V>(
        &mut self,
        name: &str,
        get: fn(&T) -> &V,
        set: fn(&mut T) -> &mut V,
    ) -> ColumnBuilder<'_, T>
    where
        V: Primitive + 'static,
    {
        let mut column = Column::new(name, V::TYPE);
        column.nullable = V::NULLABLE;

        let accessor = Accessor {
            read: Box::new(move |record| get(record).to_value()),
            write: Box::new(move |record, value, nulls, column| {
                *set(record) = load_column(value, nulls, column)?;
                Ok(())
            }),
        };

        let index = self.columns.len();
        self.columns.push(ColumnDef {
            column,
            accessor,
            references: None,
        });

        ColumnBuilder {
            def: &mut self.columns[index],
            errors: &mut self.errors,
        }
    }

    /// Materializes rows by calling `build` with the values of the named
    /// columns, in the order given. When declared, the builder is used
    /// instead of field assignment.
    ///
    /// ```
    /// # use tabula::{Record, TableBuilder};
    /// struct Tag {
    ///     id: i64,
    ///     label: String,
    /// }
    ///
    /// impl Record for Tag {
    ///     type Key = i64;
    ///
    ///     fn define(table: &mut TableBuilder<Self>) {
    ///         table.name("tags").builder(&["id", "label"], |args| {
    ///             Ok(Tag {
    ///                 id: args.next()?,
    ///                 label: args.next()?,
    ///             })
    ///         });
    ///         table.column("id", |r| &r.id, |r| &mut r.id).primary_key();
    ///         table.column("label", |r| &r.label, |r| &mut r.label);
    ///     }
    /// }
    /// ```
    pub fn builder<F>(&mut self, params: &[&str], build: F) -> &mut Self
    where
        F: Fn(&mut Args<'_>) -> Result<T> + Send + Sync + 'static,
    {
        self.builders.push(BuilderDef {
            params: params.iter().map(|param| param.to_string()).collect(),
            build: Box::new(build),
        });
        self
    }

    /// Materializes rows by calling `default` and then assigning every
    /// column.
    pub fn default_with(&mut self, default: fn() -> T) -> &mut Self {
        self.defaults.push(default);
        self
    }
}

impl<T> ColumnBuilder<'_, T> {
    /// Marks the column as the table's primary key.
    pub fn primary_key(self) -> Self {
        self.def.column.primary_key = true;
        self.def.column.nullable = false;
        self
    }

    /// Marks the column as an auto-increment primary key. Key values come
    /// from the key allocator.
    pub fn auto_increment(self) -> Self {
        let this = self.primary_key();
        this.def.column.auto_increment = true;
        this
    }

    /// Overrides the nullability derived from the field type.
    pub fn nullable(self, nullable: bool) -> Self {
        self.def.column.nullable = nullable;
        self
    }

    pub fn length(self, length: u32) -> Self {
        self.def.column.length = length;
        self
    }

    pub fn precision(self, precision: u32) -> Self {
        self.def.column.precision = precision;
        self
    }

    pub fn scale(self, scale: u32) -> Self {
        self.def.column.scale = scale;
        self
    }

    /// Stores a string column with the native JSON type.
    pub fn json(mut self) -> Self {
        if !self.def.column.ty.is_string() {
            self.invalid("json");
        }
        self.def.column.json = true;
        self
    }

    /// Stores a UUID column as 16 bytes.
    pub fn uuid_binary(mut self) -> Self {
        if self.def.column.ty != stmt::Type::Uuid {
            self.invalid("uuid_binary");
        }
        self.def.column.uuid_binary = true;
        self
    }

    pub fn unique(self) -> Self {
        self.def.column.unique = true;
        self
    }

    /// Adds a foreign key to `P`'s `id` column.
    pub fn references<P: Record>(self) -> Self {
        self.def.references = Some(References {
            target: TableRef::of::<P>(),
            column: tabula_core::schema::ForeignKey::DEFAULT_COLUMN.to_string(),
            on_delete: ReferenceOption::None,
            on_update: ReferenceOption::None,
        });
        self
    }

    /// Names the column the foreign key references.
    pub fn referenced_column(mut self, column: &str) -> Self {
        match &mut self.def.references {
            Some(references) => references.column = column.to_string(),
            None => self.no_references("referenced_column"),
        }
        self
    }

    pub fn on_delete(mut self, action: ReferenceOption) -> Self {
        match &mut self.def.references {
            Some(references) => references.on_delete = action,
            None => self.no_references("on_delete"),
        }
        self
    }

    pub fn on_update(mut self, action: ReferenceOption) -> Self {
        match &mut self.def.references {
            Some(references) => references.on_update = action,
            None => self.no_references("on_update"),
        }
        self
    }

    /// Adds an index on the column.
    pub fn index(self, name: &str) -> Self {
        self.def.column.index = Some(Index {
            name: name.to_string(),
            unique: false,
        });
        self
    }

    /// Adds a unique index on the column.
    pub fn unique_index(self, name: &str) -> Self {
        self.def.column.index = Some(Index {
            name: name.to_string(),
            unique: true,
        });
        self
    }

    fn invalid(&mut self, option: &str) {
        let message = format!(
            "`{option}` is not valid for column `{}` of type {}",
            self.def.column.name,
            self.def.column.ty.name()
        );
        self.errors.push(message);
    }

    fn no_references(&mut self, option: &str) {
        let message = format!(
            "`{option}` on column `{}` requires `references` first",
            self.def.column.name
        );
        self.errors.push(message);
    }
}
