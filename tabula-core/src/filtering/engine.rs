use chrono::{DateTime, Utc};
use tabula_model::{
    CustomFilterSet, FilterKey, FilterOperator, FilterSet, FilterValue,
    PropertyFilter, TableItem,
};
use tracing::{debug, trace};

use super::operators::{self, Operand};
use super::predicates::FilterPredicates;

/// Evaluation-time inputs that are not part of the row or the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterContext {
    /// Reference instant for the relative date operators.
    pub now: DateTime<Utc>,
}

impl FilterContext {
    pub fn now() -> Self {
        Self { now: Utc::now() }
    }

    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

/// Rows that passed the active filter, plus the size of the collection
/// before filtering so callers can report how many rows are hidden.
#[derive(Debug)]
pub struct FilterOutcome<'a, T> {
    pub items: Vec<&'a T>,
    pub total_count: usize,
}

impl<'a, T> FilterOutcome<'a, T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn hidden_count(&self) -> usize {
        self.total_count.saturating_sub(self.items.len())
    }

    pub fn into_items(self) -> Vec<&'a T> {
        self.items
    }
}

/// Evaluates predefined and custom filter sets against a collection.
#[derive(Debug)]
pub struct FilterEngine<T> {
    predicates: FilterPredicates<T>,
    fixed_now: Option<DateTime<Utc>>,
}

impl<T> Default for FilterEngine<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FilterEngine<T> {
    pub fn new() -> Self {
        Self {
            predicates: FilterPredicates::new(),
            fixed_now: None,
        }
    }

    pub fn with_predicates(predicates: FilterPredicates<T>) -> Self {
        Self {
            predicates,
            fixed_now: None,
        }
    }

    /// Pin the reference instant used by relative date operators.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.fixed_now = Some(now);
        self
    }

    pub fn predicates(&self) -> &FilterPredicates<T> {
        &self.predicates
    }

    pub fn predicates_mut(&mut self) -> &mut FilterPredicates<T> {
        &mut self.predicates
    }

    pub fn context(&self) -> FilterContext {
        self.fixed_now
            .map(FilterContext::at)
            .unwrap_or_else(FilterContext::now)
    }
}

/// Find the filters of the selected set: predefined sets by key first, then
/// custom sets by id.
pub fn resolve_filters<'s>(
    selected: &FilterKey,
    predefined: &'s [FilterSet],
    custom: &'s [CustomFilterSet],
) -> Option<&'s [PropertyFilter]> {
    let key = selected.to_string();
    if let Some(set) = predefined.iter().find(|set| set.key == key) {
        return Some(&set.filters);
    }

    let custom_id = match selected {
        FilterKey::Custom(id) => Some(*id),
        FilterKey::Named(name) => name.parse::<u32>().ok(),
    }?;
    custom
        .iter()
        .find(|set| set.id == custom_id)
        .map(|set| set.filters.as_slice())
}

impl<T: TableItem> FilterEngine<T> {
    /// Filter `items` by the selected set.
    ///
    /// No selection, or a key that matches no predefined or custom set,
    /// passes every row through unchanged.
    pub fn apply<'a>(
        &self,
        items: &'a [T],
        selected: Option<&FilterKey>,
        predefined: &[FilterSet],
        custom: &[CustomFilterSet],
    ) -> FilterOutcome<'a, T> {
        let total_count = items.len();
        let Some(selected) = selected else {
            return FilterOutcome {
                items: items.iter().collect(),
                total_count,
            };
        };

        let Some(filters) = resolve_filters(selected, predefined, custom)
        else {
            debug!(key = %selected, "unknown filter key, rows pass through");
            return FilterOutcome {
                items: items.iter().collect(),
                total_count,
            };
        };

        let ctx = self.context();
        let kept: Vec<&T> = items
            .iter()
            .filter(|item| self.matches_all(item, filters, &ctx))
            .collect();

        trace!(
            key = %selected,
            kept = kept.len(),
            total = total_count,
            "filter applied"
        );
        FilterOutcome {
            items: kept,
            total_count,
        }
    }

    /// True when `item` passes every filter.
    pub fn matches_all(
        &self,
        item: &T,
        filters: &[PropertyFilter],
        ctx: &FilterContext,
    ) -> bool {
        filters
            .iter()
            .all(|filter| self.matches(item, filter, ctx))
    }

    /// Evaluate a single filter.
    ///
    /// Multi-valued filters pass when any value matches for inclusion
    /// operators and only when every value passes for exclusion operators,
    /// so `notEqual [1, 2]` keeps rows matching neither value.
    pub fn matches(
        &self,
        item: &T,
        filter: &PropertyFilter,
        ctx: &FilterContext,
    ) -> bool {
        let operator = filter.operator;

        if let Some(predicate) = self.predicates.get(&filter.key) {
            return combine(&filter.value, operator, |operand| {
                predicate(item, operand, operator, ctx)
            });
        }

        let Some(item_value) = item.property(&filter.key) else {
            return false;
        };
        combine(&filter.value, operator, |operand| {
            operators::evaluate(operator, &item_value, operand, ctx)
        })
    }
}

fn combine(
    value: &FilterValue,
    operator: FilterOperator,
    mut test: impl FnMut(Operand<'_>) -> bool,
) -> bool {
    match value {
        FilterValue::Many(values) if operator.is_negative() => {
            values.iter().all(|value| test(Operand::Value(value)))
        }
        FilterValue::Many(values) => {
            values.iter().any(|value| test(Operand::Value(value)))
        }
        FilterValue::One(value) => test(Operand::Value(value)),
        FilterValue::Relative(window) => test(Operand::Window(*window)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tabula_model::{
        FilterOperator, PropertyValue, Record, RelativeDate, TimeUnit,
    };

    fn library() -> Vec<Record> {
        vec![
            Record::new(1)
                .with("title", "The Expanse")
                .with("monitored", true)
                .with("tags", vec![1, 3])
                .with("episodeCount", 10)
                .with("episodeFileCount", 10),
            Record::new(2)
                .with("title", "Andor")
                .with("monitored", false)
                .with("tags", vec![2])
                .with("episodeCount", 12)
                .with("episodeFileCount", 4),
            Record::new(3)
                .with("title", "Severance")
                .with("monitored", true)
                .with("tags", Vec::<i32>::new())
                .with("episodeCount", 9)
                .with("episodeFileCount", 0),
            Record::new(4).with("title", "Untagged"),
        ]
    }

    fn ids(outcome: &FilterOutcome<'_, Record>) -> Vec<i64> {
        outcome
            .items
            .iter()
            .filter_map(|item| item.id.as_number())
            .collect()
    }

    fn predefined() -> Vec<FilterSet> {
        vec![
            FilterSet::new("all", "All"),
            FilterSet::new("monitored", "Monitored Only")
                .with_filter(PropertyFilter::equal("monitored", true)),
            FilterSet::new("monitoredTagged", "Monitored and Tagged")
                .with_filter(PropertyFilter::equal("monitored", true))
                .with_filter(PropertyFilter::equal("tags", vec![1, 2])),
        ]
    }

    #[test]
    fn unknown_key_passes_everything_through() {
        let rows = library();
        let engine = FilterEngine::new();
        let outcome =
            engine.apply(&rows, Some(&"nope".into()), &predefined(), &[]);

        assert_eq!(outcome.len(), rows.len());
        assert_eq!(ids(&outcome), vec![1, 2, 3, 4]);
        assert_eq!(outcome.hidden_count(), 0);
    }

    #[test]
    fn no_selection_passes_everything_through() {
        let rows = library();
        let outcome = FilterEngine::new().apply(&rows, None, &[], &[]);
        assert_eq!(outcome.len(), 4);
    }

    #[test]
    fn filters_within_a_set_are_anded() {
        let rows = library();
        let outcome = FilterEngine::new().apply(
            &rows,
            Some(&"monitoredTagged".into()),
            &predefined(),
            &[],
        );

        assert_eq!(ids(&outcome), vec![1]);
        assert_eq!(outcome.total_count, 4);
        assert_eq!(outcome.hidden_count(), 3);
    }

    #[test]
    fn multi_valued_inclusion_and_exclusion() {
        let rows = library();
        let engine = FilterEngine::new();
        let include = vec![FilterSet::new("t", "t").with_filter(
            PropertyFilter::new("tags", vec![1, 2], FilterOperator::Equal),
        )];
        let exclude = vec![FilterSet::new("t", "t").with_filter(
            PropertyFilter::new("tags", vec![1, 2], FilterOperator::NotEqual),
        )];

        let included = engine.apply(&rows, Some(&"t".into()), &include, &[]);
        let excluded = engine.apply(&rows, Some(&"t".into()), &exclude, &[]);

        assert_eq!(ids(&included), vec![1, 2]);
        // Row 4 has no tags property at all and fails closed.
        assert_eq!(ids(&excluded), vec![3]);
    }

    #[test]
    fn custom_sets_resolve_by_id_after_predefined() {
        let rows = library();
        let custom = vec![CustomFilterSet {
            id: 7,
            view_type: "series".into(),
            label: "Starts with S".into(),
            filters: vec![PropertyFilter::new(
                "title",
                "s",
                FilterOperator::StartsWith,
            )],
        }];

        let engine = FilterEngine::new();
        let by_id = engine.apply(
            &rows,
            Some(&FilterKey::Custom(7)),
            &predefined(),
            &custom,
        );
        let by_text =
            engine.apply(&rows, Some(&"7".into()), &predefined(), &custom);

        assert_eq!(ids(&by_id), vec![3]);
        assert_eq!(ids(&by_text), vec![3]);
    }

    #[test]
    fn registered_predicates_take_precedence() {
        let predicates = FilterPredicates::new().with(
            "missing",
            |item: &Record, operand, operator, ctx| {
                let total = item
                    .property("episodeCount")
                    .and_then(|v| v.as_f64())
                    .unwrap_or(0.0);
                let have = item
                    .property("episodeFileCount")
                    .and_then(|v| v.as_f64())
                    .unwrap_or(0.0);
                let missing = PropertyValue::from(total - have);
                operators::evaluate(operator, &missing, operand, ctx)
            },
        );
        let engine = FilterEngine::with_predicates(predicates);
        let sets = vec![FilterSet::new("gaps", "Gaps").with_filter(
            PropertyFilter::new("missing", 5, FilterOperator::GreaterThan),
        )];

        let rows = library();
        let outcome = engine.apply(&rows, Some(&"gaps".into()), &sets, &[]);
        // Row 4 has neither field; the predicate treats both as zero.
        assert_eq!(ids(&outcome), vec![2, 3]);
    }

    #[test]
    fn relative_dates_use_the_pinned_clock() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let rows = vec![
            Record::new(1).with("added", now - chrono::Duration::days(2)),
            Record::new(2).with("added", now - chrono::Duration::days(40)),
        ];
        let sets = vec![FilterSet::new("recent", "Recent").with_filter(
            PropertyFilter::new(
                "added",
                RelativeDate::new(2, TimeUnit::Weeks),
                FilterOperator::InLast,
            ),
        )];

        let engine = FilterEngine::new().at(now);
        let outcome = engine.apply(&rows, Some(&"recent".into()), &sets, &[]);
        assert_eq!(ids(&outcome), vec![1]);
    }
}
