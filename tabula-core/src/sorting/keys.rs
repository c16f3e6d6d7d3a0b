//! Sort key type for comparing table rows.
//!
//! Wraps the value extracted from a row and handles missing data in its
//! comparison: rows without a value always sort after rows with one,
//! whichever direction the clause runs in.

use std::cmp::Ordering;

use ordered_float::OrderedFloat;
use tabula_model::{PropertyValue, SortDirection};

#[derive(Clone, Debug, PartialEq)]
pub struct SortKey(Option<PropertyValue>);

impl SortKey {
    /// `Null` is folded into "missing".
    pub fn new(value: Option<PropertyValue>) -> Self {
        SortKey(value.filter(|value| !value.is_null()))
    }

    pub fn missing() -> Self {
        SortKey(None)
    }

    pub fn is_missing(&self) -> bool {
        self.0.is_none()
    }

    pub fn value(&self) -> Option<&PropertyValue> {
        self.0.as_ref()
    }

    /// Compare two keys while ensuring missing values always sort last
    pub fn compare_with_order(
        &self,
        other: &Self,
        direction: SortDirection,
    ) -> Ordering {
        match (&self.0, &other.0) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => {
                let ord = compare_values(a, b);
                match direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            }
        }
    }
}

fn kind_rank(value: &PropertyValue) -> u8 {
    match value {
        PropertyValue::Null => 0,
        PropertyValue::Bool(_) => 1,
        PropertyValue::Number(_) => 2,
        PropertyValue::Date(_) => 3,
        PropertyValue::Text(_) => 4,
        PropertyValue::List(_) => 5,
    }
}

/// Total order over property values. Values of different kinds order by
/// kind; within a kind, numbers use total float order, text is ordinal,
/// dates are chronological and lists compare element by element.
pub fn compare_values(a: &PropertyValue, b: &PropertyValue) -> Ordering {
    match (a, b) {
        (PropertyValue::Null, PropertyValue::Null) => Ordering::Equal,
        (PropertyValue::Bool(x), PropertyValue::Bool(y)) => x.cmp(y),
        (PropertyValue::Number(x), PropertyValue::Number(y)) => {
            OrderedFloat(*x).cmp(&OrderedFloat(*y))
        }
        (PropertyValue::Date(x), PropertyValue::Date(y)) => x.cmp(y),
        (PropertyValue::Text(x), PropertyValue::Text(y)) => x.cmp(y),
        (PropertyValue::List(x), PropertyValue::List(y)) => {
            for (left, right) in x.iter().zip(y.iter()) {
                let ord = compare_values(left, right);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(value: impl Into<PropertyValue>) -> SortKey {
        SortKey::new(Some(value.into()))
    }

    #[test]
    fn missing_values_sort_last_in_both_directions() {
        let present = key(5);
        let missing = SortKey::missing();
        let null = SortKey::new(Some(PropertyValue::Null));

        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            assert_eq!(
                present.compare_with_order(&missing, direction),
                Ordering::Less
            );
            assert_eq!(
                null.compare_with_order(&present, direction),
                Ordering::Greater
            );
        }
        assert!(null.is_missing());
    }

    #[test]
    fn key_ordering() {
        let asc = SortDirection::Ascending;
        assert_eq!(key(1).compare_with_order(&key(10), asc), Ordering::Less);
        assert_eq!(
            key("apple").compare_with_order(&key("banana"), asc),
            Ordering::Less
        );
        assert_eq!(
            key(1).compare_with_order(&key(10), SortDirection::Descending),
            Ordering::Greater
        );
        assert_eq!(
            key(vec![1, 2]).compare_with_order(&key(vec![1, 3]), asc),
            Ordering::Less
        );
    }

    #[test]
    fn mixed_kinds_order_by_rank() {
        assert_eq!(
            compare_values(&PropertyValue::from(9), &"a".into()),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&true.into(), &PropertyValue::from(0)),
            Ordering::Less
        );
    }
}
