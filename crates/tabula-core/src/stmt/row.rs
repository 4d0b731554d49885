use super::{Type, Value};
use crate::{err, Result};

use indexmap::IndexSet;
use std::sync::Arc;

/// Column names of a result set, in projection order.
pub type Columns = Arc<IndexSet<String>>;

/// One row of a query result.
///
/// Values are addressed by column name, the way the result set labels them.
/// All rows of one result share the same [`Columns`].
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Columns,
    values: Vec<Value>,
}

impl Row {
    pub fn new(columns: Columns, values: Vec<Value>) -> Row {
        debug_assert_eq!(columns.len(), values.len());
        Row { columns, values }
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Reads the value of the named column, normalized to `ty`.
    pub fn get(&self, name: &str, ty: &Type) -> Result<Value> {
        let Some(index) = self.columns.get_index_of(name) else {
            return Err(err!("column `{name}` is not part of the result row"));
        };
        ty.cast(self.values[index].clone())
    }

    /// Reads the value at `index`, normalized to `ty`.
    pub fn get_index(&self, index: usize, ty: &Type) -> Result<Value> {
        let Some(value) = self.values.get(index) else {
            return Err(err!(
                "column index {index} out of range; row has {} columns",
                self.values.len()
            ));
        };
        ty.cast(value.clone())
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}
