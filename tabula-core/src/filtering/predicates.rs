use std::collections::HashMap;
use std::fmt;

use tabula_model::FilterOperator;

use super::engine::FilterContext;
use super::operators::Operand;

/// Per-field override: receives the row, one operand and the operator, and
/// decides whether the row passes. Typically derives a value from the row
/// and hands it to [`super::operators::evaluate`].
pub type FilterPredicate<T> = Box<
    dyn Fn(&T, Operand<'_>, FilterOperator, &FilterContext) -> bool
        + Send
        + Sync,
>;

/// Table of per-field filter predicates, keyed by field name.
///
/// Fields without an entry fall back to the generic path: the value is read
/// through `TableItem::property` and compared with the operator's default
/// semantics.
pub struct FilterPredicates<T> {
    predicates: HashMap<String, FilterPredicate<T>>,
}

impl<T> fmt::Debug for FilterPredicates<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.predicates.keys().collect();
        keys.sort();
        f.debug_struct("FilterPredicates")
            .field("keys", &keys)
            .finish()
    }
}

impl<T> Default for FilterPredicates<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FilterPredicates<T> {
    pub fn new() -> Self {
        Self {
            predicates: HashMap::new(),
        }
    }

    /// Builder-style registration.
    pub fn with(
        mut self,
        key: impl Into<String>,
        predicate: impl Fn(&T, Operand<'_>, FilterOperator, &FilterContext) -> bool
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.insert(key, predicate);
        self
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        predicate: impl Fn(&T, Operand<'_>, FilterOperator, &FilterContext) -> bool
        + Send
        + Sync
        + 'static,
    ) {
        self.predicates.insert(key.into(), Box::new(predicate));
    }

    pub fn get(&self, key: &str) -> Option<&FilterPredicate<T>> {
        self.predicates.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.predicates.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}
