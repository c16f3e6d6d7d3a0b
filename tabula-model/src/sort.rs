use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reverse(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascending" | "asc" => Ok(SortDirection::Ascending),
            "descending" | "desc" => Ok(SortDirection::Descending),
            other => Err(ModelError::UnknownDirection(other.to_string())),
        }
    }
}

/// Primary sort plus an optional tie-break clause.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SortSpec {
    pub sort_key: String,
    pub sort_direction: SortDirection,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub secondary_sort_key: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub secondary_sort_direction: Option<SortDirection>,
}

impl SortSpec {
    pub fn new(sort_key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            sort_key: sort_key.into(),
            sort_direction: direction,
            secondary_sort_key: None,
            secondary_sort_direction: None,
        }
    }

    pub fn then_by(
        mut self,
        sort_key: impl Into<String>,
        direction: SortDirection,
    ) -> Self {
        self.secondary_sort_key = Some(sort_key.into());
        self.secondary_sort_direction = Some(direction);
        self
    }

    /// The tie-break clause, if one is configured and it is not an exact
    /// repeat of the primary clause.
    pub fn effective_secondary(&self) -> Option<(&str, SortDirection)> {
        let key = self.secondary_sort_key.as_deref()?;
        let direction = self.secondary_sort_direction?;
        if key == self.sort_key && direction == self.sort_direction {
            return None;
        }
        Some((key, direction))
    }
}
