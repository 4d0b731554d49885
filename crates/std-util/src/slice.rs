use std::{collections::HashSet, hash::Hash};

pub trait SliceUtil<T> {
    /// Returns `true` when no two elements are equal.
    fn all_unique(&self) -> bool;
}

impl<T: Eq + Hash> SliceUtil<T> for [T] {
    fn all_unique(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.len());
        self.iter().all(|item| seen.insert(item))
    }
}
