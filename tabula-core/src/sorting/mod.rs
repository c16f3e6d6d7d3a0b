//! Stable client-side sorting for table views.
//!
//! Sorting extracts one [`SortKey`] per active clause for every row, then
//! runs a single stable sort over the extracted keys. Keys come from a
//! per-field comparator in [`SortComparators`] when one is registered and
//! from `TableItem::property` otherwise.

pub mod comparators;
pub mod engine;
pub mod keys;

pub use comparators::{SortComparator, SortComparators};
pub use engine::SortEngine;
pub use keys::{SortKey, compare_values};
