use std::cmp::Ordering;

use tabula_model::{SortDirection, SortSpec, TableItem};
use tracing::trace;

use super::comparators::SortComparators;
use super::keys::SortKey;

/// Sorts table rows by a [`SortSpec`].
#[derive(Debug)]
pub struct SortEngine<T> {
    comparators: SortComparators<T>,
}

impl<T> Default for SortEngine<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SortEngine<T> {
    pub fn new() -> Self {
        Self {
            comparators: SortComparators::new(),
        }
    }

    pub fn with_comparators(comparators: SortComparators<T>) -> Self {
        Self { comparators }
    }

    pub fn comparators(&self) -> &SortComparators<T> {
        &self.comparators
    }

    pub fn comparators_mut(&mut self) -> &mut SortComparators<T> {
        &mut self.comparators
    }
}

impl<T: TableItem> SortEngine<T> {
    /// Return the rows ordered by `spec` as a new vector.
    ///
    /// Keys are extracted once per row and clause before sorting. The sort
    /// is stable, so rows that tie on every clause keep their input order
    /// and sorting an already sorted slice is a no-op.
    pub fn sort<'a>(
        &self,
        items: impl IntoIterator<Item = &'a T>,
        spec: &SortSpec,
    ) -> Vec<&'a T>
    where
        T: 'a,
    {
        let items: Vec<&'a T> = items.into_iter().collect();
        let order = self.sorted_indices(&items, spec);
        order.into_iter().map(|index| items[index]).collect()
    }

    /// Positions of `items` in sorted order.
    pub fn sorted_indices(&self, items: &[&T], spec: &SortSpec) -> Vec<usize> {
        let mut clauses = vec![(spec.sort_key.as_str(), spec.sort_direction)];
        if let Some(secondary) = spec.effective_secondary() {
            clauses.push(secondary);
        }

        let mut keyed: Vec<(usize, Vec<SortKey>)> = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let keys = clauses
                    .iter()
                    .map(|(key, direction)| self.extract(item, key, *direction))
                    .collect();
                (index, keys)
            })
            .collect();

        keyed.sort_by(|(_, a), (_, b)| compare_clauses(a, b, &clauses));

        trace!(
            key = %spec.sort_key,
            direction = %spec.sort_direction,
            rows = items.len(),
            "sorted rows"
        );
        keyed.into_iter().map(|(index, _)| index).collect()
    }

    fn extract(&self, item: &T, key: &str, direction: SortDirection) -> SortKey {
        match self.comparators.get(key) {
            Some(comparator) => SortKey::new(Some(comparator(item, direction))),
            None => SortKey::new(item.property(key)),
        }
    }
}

fn compare_clauses(
    a: &[SortKey],
    b: &[SortKey],
    clauses: &[(&str, SortDirection)],
) -> Ordering {
    for ((left, right), (_, direction)) in
        a.iter().zip(b.iter()).zip(clauses.iter())
    {
        let ord = left.compare_with_order(right, *direction);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_model::{ItemId, PropertyValue, Record};

    fn rows() -> Vec<Record> {
        vec![
            Record::new(1).with("title", "Lost").with("year", 2004),
            Record::new(2).with("title", "Dark").with("year", 2017),
            Record::new(3).with("title", "Fargo").with("year", 2014),
            Record::new(4).with("title", "Atlanta").with("year", 2016),
            Record::new(5).with("title", "Barry"),
            Record::new(6).with("title", "Chernobyl").with("year", 2019),
            Record::new(7).with("title", "Dark").with("year", 2004),
        ]
    }

    fn asc(key: &str) -> SortSpec {
        SortSpec::new(key, SortDirection::Ascending)
    }

    fn desc(key: &str) -> SortSpec {
        SortSpec::new(key, SortDirection::Descending)
    }

    fn ids(sorted: &[&Record]) -> Vec<i64> {
        sorted.iter().filter_map(|row| row.id.as_number()).collect()
    }

    #[test]
    fn ascending_by_text() {
        let rows = rows();
        let sorted = SortEngine::new().sort(&rows, &asc("title"));
        assert_eq!(ids(&sorted), vec![4, 5, 6, 2, 7, 3, 1]);
    }

    #[test]
    fn missing_values_trail_in_both_directions() {
        let rows = rows();
        let engine = SortEngine::new();

        let ascending = engine.sort(&rows, &asc("year"));
        let descending = engine.sort(&rows, &desc("year"));

        assert_eq!(ids(&ascending), vec![1, 7, 3, 4, 2, 6, 5]);
        assert_eq!(ids(&descending), vec![6, 2, 4, 3, 1, 7, 5]);
    }

    #[test]
    fn secondary_clause_breaks_ties() {
        let rows = rows();
        let spec = asc("title").then_by("year", SortDirection::Ascending);
        let sorted = SortEngine::new().sort(&rows, &spec);

        let dark: Vec<i64> = ids(&sorted)
            .into_iter()
            .filter(|id| *id == 2 || *id == 7)
            .collect();
        assert_eq!(dark, vec![7, 2]);
    }

    #[test]
    fn sorting_twice_is_idempotent_and_stable() {
        let rows = rows();
        let engine = SortEngine::new();
        let spec = asc("year");

        let once = engine.sort(&rows, &spec);
        let twice = engine.sort(once.iter().copied(), &spec);
        assert_eq!(ids(&once), ids(&twice));

        // 1 and 7 tie on year and keep their input order.
        let tied: Vec<ItemId> = once
            .iter()
            .filter(|row| {
                row.property("year") == Some(PropertyValue::from(2004))
            })
            .map(|row| row.id.clone())
            .collect();
        assert_eq!(tied, vec![ItemId::from(1), ItemId::from(7)]);
    }

    #[test]
    fn unknown_key_keeps_input_order() {
        let rows = rows();
        let sorted = SortEngine::new().sort(&rows, &asc("network"));
        assert_eq!(ids(&sorted), vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn comparators_override_property_lookup() {
        // Sort by title length instead of the title itself.
        let comparators = SortComparators::new().with(
            "title",
            |row: &Record, _direction: SortDirection| {
                row.property("title")
                    .and_then(|v| v.as_str().map(str::len))
                    .into()
            },
        );
        let rows = rows();
        let sorted = SortEngine::with_comparators(comparators)
            .sort(&rows, &asc("title"));
        assert_eq!(ids(&sorted), vec![1, 2, 7, 3, 5, 4, 6]);
    }

    #[test]
    fn comparators_see_the_clause_direction() {
        // Keep row 3 pinned to the top in either direction.
        let comparators = SortComparators::new().with(
            "year",
            |row: &Record, direction: SortDirection| {
                if row.id == ItemId::from(3) {
                    return match direction {
                        SortDirection::Ascending => PropertyValue::from(0),
                        SortDirection::Descending => PropertyValue::from(9999),
                    };
                }
                row.property("year").unwrap_or_default()
            },
        );
        let engine = SortEngine::with_comparators(comparators);
        let rows = rows();

        let ascending = engine.sort(&rows, &asc("year"));
        let descending = engine.sort(&rows, &desc("year"));
        assert_eq!(ids(&ascending)[0], 3);
        assert_eq!(ids(&descending)[0], 3);
    }
}
