use crate::ids::ItemId;
use crate::value::PropertyValue;

/// A row the table engines can operate on.
///
/// `property` is the generic field read used whenever no per-field
/// predicate or comparator is registered for a key. Returning `None` means
/// the row has no such field, which filters treat as a non-match and sorts
/// treat as a missing value.
pub trait TableItem {
    fn id(&self) -> ItemId;

    fn property(&self, key: &str) -> Option<PropertyValue>;
}

impl<T: TableItem + ?Sized> TableItem for &T {
    fn id(&self) -> ItemId {
        (**self).id()
    }

    fn property(&self, key: &str) -> Option<PropertyValue> {
        (**self).property(key)
    }
}
