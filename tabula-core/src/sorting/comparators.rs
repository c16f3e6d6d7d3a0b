use std::collections::HashMap;
use std::fmt;

use tabula_model::{PropertyValue, SortDirection};

/// Per-field sort override: derives the value a row sorts by. Receives the
/// clause direction so that, for example, a status column can keep pinned
/// rows on top either way. Returning `Null` marks the value as missing.
pub type SortComparator<T> =
    Box<dyn Fn(&T, SortDirection) -> PropertyValue + Send + Sync>;

/// Table of per-field sort value extractors, keyed by field name. Fields
/// without an entry sort by `TableItem::property`.
pub struct SortComparators<T> {
    comparators: HashMap<String, SortComparator<T>>,
}

impl<T> fmt::Debug for SortComparators<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.comparators.keys().collect();
        keys.sort();
        f.debug_struct("SortComparators")
            .field("keys", &keys)
            .finish()
    }
}

impl<T> Default for SortComparators<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SortComparators<T> {
    pub fn new() -> Self {
        Self {
            comparators: HashMap::new(),
        }
    }

    pub fn with(
        mut self,
        key: impl Into<String>,
        comparator: impl Fn(&T, SortDirection) -> PropertyValue
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.insert(key, comparator);
        self
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        comparator: impl Fn(&T, SortDirection) -> PropertyValue
        + Send
        + Sync
        + 'static,
    ) {
        self.comparators.insert(key.into(), Box::new(comparator));
    }

    pub fn get(&self, key: &str) -> Option<&SortComparator<T>> {
        self.comparators.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.comparators.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.comparators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comparators.is_empty()
    }
}
