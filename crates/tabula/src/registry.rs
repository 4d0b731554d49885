use crate::{Model, Record, Result};

use std::{
    any::{Any, TypeId},
    cell::RefCell,
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};
use tabula_core::{schema::Table, Error};

/// Caches the [`Model`] of every record type seen so far.
///
/// A type is described at most once for the life of the registry; later
/// lookups return the same `Arc`.
#[derive(Debug, Default)]
pub struct Registry {
    models: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

thread_local! {
    /// Types currently being described on this thread. Used to detect
    /// foreign key cycles, which would otherwise recurse forever.
    static DESCRIBING: RefCell<Vec<TypeId>> = const { RefCell::new(Vec::new()) };
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Returns the model of `T`, describing the type on first use.
    pub fn describe<T: Record>(&self) -> Result<Arc<Model<T>>> {
        let type_id = TypeId::of::<T>();

        if let Some(model) = self.cached::<T>() {
            return Ok(model);
        }

        let _guard = Describing::enter::<T>()?;

        // Built outside the lock: describing `T` may describe the types its
        // foreign keys reference.
        let model = Arc::new(Model::<T>::build(self)?);

        let mut models = self.models.write().unwrap_or_else(PoisonError::into_inner);
        let entry = models.entry(type_id).or_insert(model).clone();
        drop(models);

        entry.downcast::<Model<T>>().map_err(|_| {
            Error::invalid_schema(format!(
                "registry entry for `{}` has an unexpected type",
                std::any::type_name::<T>()
            ))
        })
    }

    /// Returns the table of `T`.
    pub fn table<T: Record>(&self) -> Result<Arc<Table>> {
        Ok(self.describe::<T>()?.table().clone())
    }

    /// Returns the primary key of `record`.
    pub fn primary_key<T: Record>(&self, record: &T) -> Result<T::Key> {
        self.describe::<T>()?.primary_key(record)
    }

    /// Number of described types.
    pub fn len(&self) -> usize {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cached<T: Record>(&self) -> Option<Arc<Model<T>>> {
        let models = self.models.read().unwrap_or_else(PoisonError::into_inner);
        models
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|model| model.downcast::<Model<T>>().ok())
    }
}

/// Marks a type as being described on the current thread.
struct Describing;

impl Describing {
    fn enter<T: 'static>() -> Result<Describing> {
        let type_id = TypeId::of::<T>();

        DESCRIBING.with(|stack| {
            let mut stack = stack.borrow_mut();

            if stack.contains(&type_id) {
                return Err(Error::invalid_schema(format!(
                    "foreign keys of `{}` form a cycle",
                    std::any::type_name::<T>()
                )));
            }

            stack.push(type_id);
            Ok(Describing)
        })
    }
}

impl Drop for Describing {
    fn drop(&mut self) {
        DESCRIBING.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}
