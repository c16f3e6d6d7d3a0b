use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::value::PropertyValue;

/// Key of the catch-all predefined filter every view ships with.
pub const ALL_FILTER_KEY: &str = "all";

/// Comparison applied by a [`PropertyFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum FilterOperator {
    #[default]
    Equal,
    NotEqual,
    Contains,
    NotContains,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    StartsWith,
    NotStartsWith,
    EndsWith,
    NotEndsWith,
    InLast,
    NotInLast,
    InNext,
    NotInNext,
}

impl FilterOperator {
    pub fn all() -> &'static [FilterOperator] {
        use FilterOperator::*;
        &[
            Equal,
            NotEqual,
            Contains,
            NotContains,
            GreaterThan,
            GreaterThanOrEqual,
            LessThan,
            LessThanOrEqual,
            StartsWith,
            NotStartsWith,
            EndsWith,
            NotEndsWith,
            InLast,
            NotInLast,
            InNext,
            NotInNext,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Equal => "equal",
            FilterOperator::NotEqual => "notEqual",
            FilterOperator::Contains => "contains",
            FilterOperator::NotContains => "notContains",
            FilterOperator::GreaterThan => "greaterThan",
            FilterOperator::GreaterThanOrEqual => "greaterThanOrEqual",
            FilterOperator::LessThan => "lessThan",
            FilterOperator::LessThanOrEqual => "lessThanOrEqual",
            FilterOperator::StartsWith => "startsWith",
            FilterOperator::NotStartsWith => "notStartsWith",
            FilterOperator::EndsWith => "endsWith",
            FilterOperator::NotEndsWith => "notEndsWith",
            FilterOperator::InLast => "inLast",
            FilterOperator::NotInLast => "notInLast",
            FilterOperator::InNext => "inNext",
            FilterOperator::NotInNext => "notInNext",
        }
    }

    /// Exclusion operators. A multi-valued filter using one of these only
    /// passes when none of the listed values match.
    pub fn is_negative(&self) -> bool {
        matches!(
            self,
            FilterOperator::NotEqual
                | FilterOperator::NotContains
                | FilterOperator::NotStartsWith
                | FilterOperator::NotEndsWith
                | FilterOperator::NotInLast
                | FilterOperator::NotInNext
        )
    }

    /// The inclusion operator a negative operator negates. Positive
    /// operators map to themselves.
    pub fn positive(&self) -> FilterOperator {
        match self {
            FilterOperator::NotEqual => FilterOperator::Equal,
            FilterOperator::NotContains => FilterOperator::Contains,
            FilterOperator::NotStartsWith => FilterOperator::StartsWith,
            FilterOperator::NotEndsWith => FilterOperator::EndsWith,
            FilterOperator::NotInLast => FilterOperator::InLast,
            FilterOperator::NotInNext => FilterOperator::InNext,
            other => *other,
        }
    }

    pub fn is_relative_date(&self) -> bool {
        matches!(
            self.positive(),
            FilterOperator::InLast | FilterOperator::InNext
        )
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterOperator::all()
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| ModelError::UnknownOperator(s.to_string()))
    }
}

/// Unit of a [`RelativeDate`] window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TimeUnit {
    Days,
    Weeks,
    Months,
    Years,
}

impl FromStr for TimeUnit {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "days" => Ok(TimeUnit::Days),
            "weeks" => Ok(TimeUnit::Weeks),
            "months" => Ok(TimeUnit::Months),
            "years" => Ok(TimeUnit::Years),
            other => Err(ModelError::UnknownTimeUnit(other.to_string())),
        }
    }
}

/// "Within the last/next N units" window used by the relative date
/// operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelativeDate {
    pub time: u32,
    pub unit: TimeUnit,
}

impl RelativeDate {
    pub fn new(time: u32, unit: TimeUnit) -> Self {
        Self { time, unit }
    }
}

/// Right-hand side of a [`PropertyFilter`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum FilterValue {
    /// Multi-valued filter; how the per-value results combine depends on
    /// the operator polarity.
    Many(Vec<PropertyValue>),
    Relative(RelativeDate),
    One(PropertyValue),
}

impl<T: Into<PropertyValue>> From<T> for FilterValue {
    fn from(value: T) -> Self {
        match value.into() {
            PropertyValue::List(values) => FilterValue::Many(values),
            single => FilterValue::One(single),
        }
    }
}

impl From<RelativeDate> for FilterValue {
    fn from(value: RelativeDate) -> Self {
        FilterValue::Relative(value)
    }
}

/// A single `(field, operator, value)` test.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyFilter {
    pub key: String,
    pub value: FilterValue,
    #[cfg_attr(feature = "serde", serde(rename = "type", default))]
    pub operator: FilterOperator,
}

impl PropertyFilter {
    pub fn new(
        key: impl Into<String>,
        value: impl Into<FilterValue>,
        operator: FilterOperator,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            operator,
        }
    }

    pub fn equal(key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(key, value, FilterOperator::Equal)
    }
}

/// Identifies the active filter of a view: a predefined set by key or a
/// custom set by its persisted id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum FilterKey {
    Custom(u32),
    Named(String),
}

impl FilterKey {
    pub fn all() -> Self {
        FilterKey::Named(ALL_FILTER_KEY.to_string())
    }
}

impl Default for FilterKey {
    fn default() -> Self {
        FilterKey::all()
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterKey::Custom(id) => write!(f, "{id}"),
            FilterKey::Named(key) => f.write_str(key),
        }
    }
}

impl From<&str> for FilterKey {
    fn from(value: &str) -> Self {
        FilterKey::Named(value.to_string())
    }
}

impl From<String> for FilterKey {
    fn from(value: String) -> Self {
        FilterKey::Named(value)
    }
}

impl From<u32> for FilterKey {
    fn from(value: u32) -> Self {
        FilterKey::Custom(value)
    }
}

/// A named conjunction of property filters shipped with a view.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterSet {
    pub key: String,
    pub label: String,
    pub filters: Vec<PropertyFilter>,
}

impl FilterSet {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            filters: Vec::new(),
        }
    }

    pub fn with_filter(mut self, filter: PropertyFilter) -> Self {
        self.filters.push(filter);
        self
    }
}

/// A user-authored filter set persisted remotely and scoped to one view.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CustomFilterSet {
    pub id: u32,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub view_type: String,
    pub label: String,
    pub filters: Vec<PropertyFilter>,
}

/// A custom filter being created (`id` is `None`) or edited.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CustomFilterDraft {
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub id: Option<u32>,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub view_type: String,
    pub label: String,
    pub filters: Vec<PropertyFilter>,
}

impl CustomFilterDraft {
    pub fn new(view_type: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: None,
            view_type: view_type.into(),
            label: label.into(),
            filters: Vec::new(),
        }
    }

    pub fn with_filter(mut self, filter: PropertyFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn into_set(self, id: u32) -> CustomFilterSet {
        CustomFilterSet {
            id,
            view_type: self.view_type,
            label: self.label,
            filters: self.filters,
        }
    }
}

impl From<CustomFilterSet> for CustomFilterDraft {
    fn from(set: CustomFilterSet) -> Self {
        Self {
            id: Some(set.id),
            view_type: set.view_type,
            label: set.label,
            filters: set.filters,
        }
    }
}
