//! Generic operator semantics shared by the fallback path and by custom
//! predicates that derive a value before comparing it.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, Months, Utc};
use tabula_model::{FilterOperator, PropertyValue, RelativeDate, TimeUnit};

use super::engine::FilterContext;

/// One unit of a filter's right-hand side, after multi-valued filters have
/// been split into their individual values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand<'a> {
    Value(&'a PropertyValue),
    Window(RelativeDate),
}

/// Apply `operator` to a row value and one operand.
///
/// Negative operators are the negation of their positive counterpart, so a
/// row whose value cannot be compared at all passes `notEqual` but fails
/// `equal`.
pub fn evaluate(
    operator: FilterOperator,
    item_value: &PropertyValue,
    operand: Operand<'_>,
    ctx: &FilterContext,
) -> bool {
    let positive = operator.positive();
    let matched = match operand {
        Operand::Window(window) => match positive {
            FilterOperator::InLast | FilterOperator::InNext => {
                within_window(positive, item_value, window, ctx.now)
            }
            _ => false,
        },
        Operand::Value(value) => evaluate_value(positive, item_value, value),
    };

    if operator.is_negative() {
        !matched
    } else {
        matched
    }
}

fn evaluate_value(
    positive: FilterOperator,
    item_value: &PropertyValue,
    value: &PropertyValue,
) -> bool {
    match positive {
        FilterOperator::Equal => loosely_equal(item_value, value),
        FilterOperator::Contains => contains(item_value, value),
        FilterOperator::StartsWith => {
            text_test(item_value, value, |a, b| a.starts_with(b))
        }
        FilterOperator::EndsWith => {
            text_test(item_value, value, |a, b| a.ends_with(b))
        }
        FilterOperator::GreaterThan => {
            compare(item_value, value) == Some(Ordering::Greater)
        }
        FilterOperator::GreaterThanOrEqual => matches!(
            compare(item_value, value),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        FilterOperator::LessThan => {
            compare(item_value, value) == Some(Ordering::Less)
        }
        FilterOperator::LessThanOrEqual => matches!(
            compare(item_value, value),
            Some(Ordering::Less | Ordering::Equal)
        ),
        // Relative operators need a window, not a plain value.
        _ => false,
    }
}

/// Equality as the filters see it: a list matches when any element does.
pub fn loosely_equal(item_value: &PropertyValue, value: &PropertyValue) -> bool {
    match item_value {
        PropertyValue::List(elements) => {
            elements.iter().any(|element| scalar_equal(element, value))
        }
        _ => scalar_equal(item_value, value),
    }
}

fn scalar_equal(a: &PropertyValue, b: &PropertyValue) -> bool {
    match (a, b) {
        (PropertyValue::Null, PropertyValue::Null) => true,
        (PropertyValue::Bool(x), PropertyValue::Bool(y)) => x == y,
        (PropertyValue::Number(x), PropertyValue::Number(y)) => x == y,
        (PropertyValue::Text(x), PropertyValue::Text(y)) => x == y,
        (PropertyValue::Date(_), _) | (_, PropertyValue::Date(_)) => {
            match (a.as_date(), b.as_date()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            }
        }
        _ => false,
    }
}

fn contains(item_value: &PropertyValue, value: &PropertyValue) -> bool {
    match item_value {
        PropertyValue::Text(text) => match operand_text(value) {
            Some(needle) => {
                text.to_lowercase().contains(&needle.to_lowercase())
            }
            None => false,
        },
        PropertyValue::List(elements) => {
            elements.iter().any(|element| scalar_equal(element, value))
        }
        _ => false,
    }
}

fn text_test(
    item_value: &PropertyValue,
    value: &PropertyValue,
    test: impl Fn(&str, &str) -> bool,
) -> bool {
    let Some(needle) = operand_text(value) else {
        return false;
    };
    let needle = needle.to_lowercase();
    match item_value {
        PropertyValue::Text(text) => test(&text.to_lowercase(), &needle),
        PropertyValue::List(elements) => elements.iter().any(|element| {
            element
                .as_str()
                .is_some_and(|text| test(&text.to_lowercase(), &needle))
        }),
        _ => false,
    }
}

fn operand_text(value: &PropertyValue) -> Option<String> {
    match value {
        PropertyValue::Text(text) => Some(text.clone()),
        PropertyValue::Number(n) if n.fract() == 0.0 && n.is_finite() => {
            Some(format!("{}", *n as i64))
        }
        PropertyValue::Number(n) => Some(n.to_string()),
        PropertyValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Ordering between two values of the same kind. Dates compare with text
/// that parses as RFC 3339. Everything else is incomparable.
pub fn compare(a: &PropertyValue, b: &PropertyValue) -> Option<Ordering> {
    match (a, b) {
        (PropertyValue::Number(x), PropertyValue::Number(y)) => {
            x.partial_cmp(y)
        }
        (PropertyValue::Text(x), PropertyValue::Text(y)) => Some(x.cmp(y)),
        (PropertyValue::Bool(x), PropertyValue::Bool(y)) => Some(x.cmp(y)),
        (PropertyValue::Date(_), _) | (_, PropertyValue::Date(_)) => {
            Some(a.as_date()?.cmp(&b.as_date()?))
        }
        _ => None,
    }
}

fn within_window(
    positive: FilterOperator,
    item_value: &PropertyValue,
    window: RelativeDate,
    now: DateTime<Utc>,
) -> bool {
    let Some(date) = item_value.as_date() else {
        return false;
    };
    match positive {
        FilterOperator::InLast => shift(now, window, false)
            .is_some_and(|start| date >= start && date <= now),
        FilterOperator::InNext => shift(now, window, true)
            .is_some_and(|end| date >= now && date <= end),
        _ => false,
    }
}

/// Move `now` by the window, forwards or backwards.
pub fn shift(
    now: DateTime<Utc>,
    window: RelativeDate,
    forward: bool,
) -> Option<DateTime<Utc>> {
    let time = i64::from(window.time);
    match window.unit {
        TimeUnit::Days | TimeUnit::Weeks => {
            let span = if window.unit == TimeUnit::Days {
                Duration::try_days(time)?
            } else {
                Duration::try_weeks(time)?
            };
            if forward {
                now.checked_add_signed(span)
            } else {
                now.checked_sub_signed(span)
            }
        }
        TimeUnit::Months | TimeUnit::Years => {
            let months = if window.unit == TimeUnit::Years {
                window.time.checked_mul(12)?
            } else {
                window.time
            };
            if forward {
                now.checked_add_months(Months::new(months))
            } else {
                now.checked_sub_months(Months::new(months))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ctx() -> FilterContext {
        FilterContext::at(Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap())
    }

    fn check(
        op: FilterOperator,
        item: impl Into<PropertyValue>,
        value: impl Into<PropertyValue>,
    ) -> bool {
        let value = value.into();
        evaluate(op, &item.into(), Operand::Value(&value), &ctx())
    }

    #[test]
    fn equality_over_scalars_and_lists() {
        assert!(check(FilterOperator::Equal, 3, 3));
        assert!(!check(FilterOperator::Equal, 3, "3"));
        assert!(check(FilterOperator::Equal, vec![1, 2], 2));
        assert!(check(FilterOperator::NotEqual, vec![1, 2], 5));
        assert!(!check(FilterOperator::NotEqual, vec![1, 2], 1));
    }

    #[test]
    fn contains_is_case_insensitive_for_text() {
        assert!(check(FilterOperator::Contains, "The Expanse", "expanse"));
        assert!(check(FilterOperator::NotContains, "The Expanse", "wire"));
        assert!(check(FilterOperator::Contains, "Season 12", 12));
        assert!(check(FilterOperator::Contains, vec!["a", "b"], "b"));
        assert!(!check(FilterOperator::Contains, 42, 4));
    }

    #[test]
    fn ordering_requires_matching_kinds() {
        assert!(check(FilterOperator::GreaterThan, 10, 5));
        assert!(check(FilterOperator::LessThanOrEqual, 5, 5));
        assert!(!check(FilterOperator::GreaterThan, "10", 5));
        assert!(check(FilterOperator::LessThan, "alpha", "beta"));
    }

    #[test]
    fn dates_compare_with_rfc3339_text() {
        let aired = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(check(
            FilterOperator::LessThan,
            aired,
            "2024-02-01T00:00:00Z"
        ));
        assert!(check(FilterOperator::Equal, aired, "2024-01-01T00:00:00Z"));
    }

    #[test]
    fn prefix_and_suffix_tests() {
        assert!(check(FilterOperator::StartsWith, "Breaking Bad", "break"));
        assert!(check(FilterOperator::EndsWith, "Breaking Bad", "BAD"));
        assert!(check(FilterOperator::NotStartsWith, "Breaking Bad", "bad"));
    }

    #[test]
    fn relative_windows() {
        let ctx = ctx();
        let window = RelativeDate::new(7, TimeUnit::Days);
        let recent: PropertyValue =
            Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap().into();
        let old: PropertyValue =
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap().into();
        let upcoming: PropertyValue =
            Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap().into();

        let op = Operand::Window(window);
        assert!(evaluate(FilterOperator::InLast, &recent, op, &ctx));
        assert!(!evaluate(FilterOperator::InLast, &old, op, &ctx));
        assert!(evaluate(FilterOperator::NotInLast, &old, op, &ctx));
        assert!(!evaluate(FilterOperator::InNext, &upcoming, op, &ctx));

        let month = Operand::Window(RelativeDate::new(1, TimeUnit::Months));
        assert!(evaluate(FilterOperator::InNext, &upcoming, month, &ctx));
        assert!(!evaluate(
            FilterOperator::InLast,
            &PropertyValue::Null,
            month,
            &ctx
        ));
    }
}
