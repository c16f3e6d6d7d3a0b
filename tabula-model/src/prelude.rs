//! Frequently used model types for table views.

pub use crate::columns::Column;
pub use crate::filter_types::{
    CustomFilterDraft, CustomFilterSet, FilterKey, FilterOperator, FilterSet,
    FilterValue, PropertyFilter, RelativeDate, TimeUnit,
};
pub use crate::ids::ItemId;
pub use crate::item::TableItem;
pub use crate::options::TableOptions;
pub use crate::record::Record;
pub use crate::sort::{SortDirection, SortSpec};
pub use crate::value::PropertyValue;
