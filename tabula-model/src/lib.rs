//! Core data model definitions shared across Tabula crates.
//!
//! Everything here is plain data: the engines that act on these types live
//! in `tabula-core`. Serde support is opt-in through the `serde` feature so
//! that callers who only evaluate filters in memory do not pay for it.
#![allow(missing_docs)]

pub use ::chrono;

pub mod columns;
pub mod error;
pub mod filter_types;
pub mod ids;
pub mod item;
pub mod options;
pub mod prelude;
pub mod record;
pub mod sort;
pub mod value;

pub use columns::Column;
pub use error::{ModelError, Result as ModelResult};
pub use filter_types::{
    ALL_FILTER_KEY, CustomFilterDraft, CustomFilterSet, FilterKey,
    FilterOperator, FilterSet, FilterValue, PropertyFilter, RelativeDate,
    TimeUnit,
};
pub use ids::ItemId;
pub use item::TableItem;
pub use options::{PersistedColumn, PersistedOptions, TableOptions};
pub use record::Record;
pub use sort::{SortDirection, SortSpec};
pub use value::PropertyValue;
