use crate::Result;

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc, PoisonError, RwLock,
    },
};
use tabula_core::{
    schema::{Table, TableId},
    Error,
};

/// Hands out primary key values for auto-increment tables.
///
/// One counter per table. Counters live in process memory: keys are unique
/// only among processes that share this allocator and only if it was
/// seeded with the store's current maximum.
#[derive(Debug, Default)]
pub struct KeyAllocator {
    counters: RwLock<HashMap<TableId, Arc<AtomicI64>>>,
}

impl KeyAllocator {
    pub fn new() -> KeyAllocator {
        KeyAllocator::default()
    }

    /// Sets the counter so that the next generated key is `max + 1`.
    pub fn seed(&self, table: &Table, max: i64) {
        self.counter(table.id).store(max, Ordering::SeqCst);
    }

    /// Returns the next key for `table`. A table that was never seeded
    /// starts at 1.
    pub fn generate(&self, table: &Table) -> Result<i64> {
        if !table.is_auto_increment() {
            return Err(Error::invalid_schema(format!(
                "table `{}` has no auto-increment primary key",
                table.name
            )));
        }

        // Leaves the counter untouched once it reaches `i64::MAX`
        self.counter(table.id)
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| prev.checked_add(1))
            .map(|prev| prev + 1)
            .map_err(|_| {
                Error::invalid_schema(format!("key space of table `{}` is exhausted", table.name))
            })
    }

    /// Resets the counter of `table` to zero.
    pub fn reset(&self, table: &Table) {
        self.seed(table, 0);
    }

    /// The last key handed out, or the seeded maximum.
    pub fn current(&self, table: &Table) -> i64 {
        self.counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&table.id)
            .map_or(0, |counter| counter.load(Ordering::SeqCst))
    }

    fn counter(&self, table: TableId) -> Arc<AtomicI64> {
        if let Some(counter) = self
            .counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&table)
        {
            return counter.clone();
        }

        self.counters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(table)
            .or_default()
            .clone()
    }
}
