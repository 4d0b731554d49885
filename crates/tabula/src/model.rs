mod builder;
pub use builder::{ColumnBuilder, TableBuilder};

use crate::{primitive::load_column, NullPolicy, Primitive, Record, Registry, Result};

use std::{any::TypeId, collections::HashSet, fmt, sync::Arc};
use tabula_core::{
    err,
    schema::{Column, ForeignKey, Table},
    stmt, Error,
};

type ReadFn<T> = Box<dyn Fn(&T) -> stmt::Value + Send + Sync>;
type WriteFn<T> = Box<dyn Fn(&mut T, stmt::Value, NullPolicy, &str) -> Result<()> + Send + Sync>;
pub(crate) type BuildFn<T> = Box<dyn Fn(&mut Args<'_>) -> Result<T> + Send + Sync>;

/// Describes how a record type maps to its table.
///
/// Computed once per type by the [`Registry`] and never mutated afterwards.
pub struct Model<T> {
    table: Arc<Table>,

    /// One accessor per column, in column order
    accessors: Vec<Accessor<T>>,

    materialize: Materialize<T>,
}

/// Reads and writes one field of a record.
pub(crate) struct Accessor<T> {
    read: ReadFn<T>,
    write: WriteFn<T>,
}

/// How a fetched row becomes a record.
enum Materialize<T> {
    /// Call the declared builder with the listed columns, in order.
    ByBuilder { params: Vec<usize>, build: BuildFn<T> },

    /// Default-construct, then assign every column.
    ByFieldAssignment { default: fn() -> T },
}

/// Values handed to a record builder, in declared parameter order.
pub struct Args<'a> {
    params: Vec<(&'a Column, stmt::Value)>,
    position: usize,
    nulls: NullPolicy,
}

impl<T: Record> Model<T> {
    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    /// The builder's parameters as `(column, type)` pairs, or `None` when
    /// rows are materialized by field assignment.
    pub fn builder_params(&self) -> Option<Vec<(&str, stmt::Type)>> {
        match &self.materialize {
            Materialize::ByBuilder { params, .. } => Some(
                params
                    .iter()
                    .map(|&index| {
                        let column = &self.table.columns[index];
                        (&column.name[..], column.ty)
                    })
                    .collect(),
            ),
            Materialize::ByFieldAssignment { .. } => None,
        }
    }

    /// Every column value, in column order. This is the INSERT binding.
    pub(crate) fn values(&self, record: &T) -> Vec<stmt::Value> {
        self.accessors
            .iter()
            .map(|accessor| (accessor.read)(record))
            .collect()
    }

    /// Non-key column values in column order, followed by the key. This is
    /// the UPDATE binding.
    pub(crate) fn update_values(&self, record: &T) -> Result<Vec<stmt::Value>> {
        let key = self.require_key("update")?;

        let mut values: Vec<_> = self
            .accessors
            .iter()
            .enumerate()
            .filter(|&(index, _)| index != key)
            .map(|(_, accessor)| (accessor.read)(record))
            .collect();
        values.push((self.accessors[key].read)(record));
        Ok(values)
    }

    pub(crate) fn key_value(&self, record: &T, operation: &str) -> Result<stmt::Value> {
        let key = self.require_key(operation)?;
        Ok((self.accessors[key].read)(record))
    }

    /// Returns the primary key of `record`.
    pub fn primary_key(&self, record: &T) -> Result<T::Key> {
        T::Key::load(self.key_value(record, "primary_key")?)
    }

    /// Builds a record from a fetched row.
    pub(crate) fn load(&self, row: &stmt::Row, nulls: NullPolicy) -> Result<T> {
        match &self.materialize {
            Materialize::ByBuilder { params, build } => {
                let params = params
                    .iter()
                    .map(|&index| {
                        let column = &self.table.columns[index];
                        Ok((column, row.get(&column.name, &column.ty)?))
                    })
                    .collect::<Result<Vec<_>>>()?;

                build(&mut Args {
                    params,
                    position: 0,
                    nulls,
                })
            }
            Materialize::ByFieldAssignment { default } => {
                let mut record = default();

                for (column, accessor) in self.table.columns.iter().zip(&self.accessors) {
                    let value = row.get(&column.name, &column.ty)?;
                    (accessor.write)(&mut record, value, nulls, &column.name)?;
                }

                Ok(record)
            }
        }
    }

    fn require_key(&self, operation: &str) -> Result<usize> {
        let key = self.table.require_primary_key(operation)?;
        Ok(self.table.column_index(&key.name).unwrap_or_default())
    }

    /// Runs the type's definition and validates it.
    pub(crate) fn build(registry: &Registry) -> Result<Model<T>> {
        let mut builder = TableBuilder::<T>::new();
        T::define(&mut builder);

        let type_name = std::any::type_name::<T>();

        if let Some(error) = builder.errors.first() {
            return Err(Error::invalid_schema(format!("`{type_name}`: {error}")));
        }

        let Some(name) = builder.name else {
            return Err(Error::invalid_schema(format!(
                "`{type_name}` does not declare a table name"
            )));
        };

        let mut columns = Vec::with_capacity(builder.columns.len());
        let mut accessors = Vec::with_capacity(builder.columns.len());

        // Columns of this type, for resolving self-references.
        let own_columns: HashSet<String> = builder
            .columns
            .iter()
            .map(|def| def.column.name.clone())
            .collect();

        for def in builder.columns {
            let mut column = def.column;

            if let Some(references) = def.references {
                let (table, has_column) = if references.target.type_id() == TypeId::of::<T>() {
                    (name.clone(), own_columns.contains(&references.column))
                } else {
                    let target = references.target.table(registry).map_err(|e| {
                        e.context(err!(
                            "resolving foreign key `{}.{}`",
                            name,
                            column.name
                        ))
                    })?;
                    let has_column = target.column(&references.column).is_some();
                    (target.name.clone(), has_column)
                };

                if !has_column {
                    return Err(Error::invalid_schema(format!(
                        "foreign key `{}.{}` references missing column `{}.{}`",
                        name, column.name, table, references.column
                    )));
                }

                column.foreign_key = Some(ForeignKey {
                    table,
                    column: references.column,
                    on_delete: references.on_delete,
                    on_update: references.on_update,
                });
            }

            columns.push(column);
            accessors.push(def.accessor);
        }

        let table = Table::new(name, columns)?;

        if let Some(key) = table.primary_key_column() {
            if key.ty != T::Key::TYPE {
                return Err(Error::invalid_schema(format!(
                    "`{type_name}` declares a key of type {} but key column `{}` has type {}",
                    T::Key::TYPE.name(),
                    key.name,
                    key.ty.name()
                )));
            }
        }

        let materialize = Self::materialize(&table, builder.builders, builder.defaults)?;

        tracing::debug!(
            table = %table.name,
            columns = table.columns.len(),
            builder = matches!(materialize, Materialize::ByBuilder { .. }),
            "described record type"
        );

        Ok(Model {
            table: Arc::new(table),
            accessors,
            materialize,
        })
    }

    fn materialize(
        table: &Table,
        mut builders: Vec<builder::BuilderDef<T>>,
        defaults: Vec<fn() -> T>,
    ) -> Result<Materialize<T>> {
        if builders.len() > 1 {
            return Err(Error::invalid_schema(format!(
                "table `{}` declares {} builders; at most one is allowed",
                table.name,
                builders.len()
            )));
        }

        if defaults.len() > 1 {
            return Err(Error::invalid_schema(format!(
                "table `{}` declares `default_with` more than once",
                table.name
            )));
        }

        if let Some(builder) = builders.pop() {
            if builder.params.is_empty() {
                return Err(Error::invalid_schema(format!(
                    "builder for table `{}` has no parameters",
                    table.name
                )));
            }

            let mut params = Vec::with_capacity(builder.params.len());

            for param in &builder.params {
                let Some(index) = table.column_index(param) else {
                    return Err(Error::invalid_schema(format!(
                        "builder parameter `{param}` does not match a column of table `{}`",
                        table.name
                    )));
                };

                if params.contains(&index) {
                    return Err(Error::invalid_schema(format!(
                        "builder parameter `{param}` of table `{}` is listed twice",
                        table.name
                    )));
                }

                params.push(index);
            }

            return Ok(Materialize::ByBuilder {
                params,
                build: builder.build,
            });
        }

        match defaults.first() {
            Some(&default) => Ok(Materialize::ByFieldAssignment { default }),
            None => Err(Error::invalid_schema(format!(
                "table `{}` declares neither a builder nor `default_with`",
                table.name
            ))),
        }
    }
}

impl<T> fmt::Debug for Model<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strategy = match self.materialize {
            Materialize::ByBuilder { .. } => "builder",
            Materialize::ByFieldAssignment { .. } => "field assignment",
        };

        f.debug_struct("Model")
            .field("table", &self.table)
            .field("materialize", &strategy)
            .finish()
    }
}

impl Args<'_> {
    /// Returns the next parameter, converted to `V`.
    pub fn next<V: Primitive>(&mut self) -> Result<V> {
        let position = self.position;
        let declared = self.params.len();

        let Some((column, value)) = self.params.get_mut(position) else {
            return Err(Error::invalid_schema(format!(
                "builder read parameter {} but only {declared} are declared",
                position + 1,
            )));
        };

        if column.ty != V::TYPE {
            return Err(Error::invalid_schema(format!(
                "builder parameter `{}` read as {} but the column has type {}",
                column.name,
                V::TYPE.name(),
                column.ty.name()
            )));
        }

        self.position += 1;
        load_column(std::mem::take(value), self.nulls, &column.name)
    }

    /// Number of parameters not yet read.
    pub fn remaining(&self) -> usize {
        self.params.len() - self.position
    }
}
