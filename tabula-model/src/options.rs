use std::collections::BTreeMap;

use crate::columns::Column;
use crate::filter_types::FilterKey;
use crate::sort::{SortDirection, SortSpec};
use crate::value::PropertyValue;

/// Live view configuration of one table: paging, active filter, sort and
/// column layout, plus free-form per-view toggles.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TableOptions {
    pub page_size: usize,
    pub selected_filter_key: FilterKey,
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
    pub columns: Vec<Column>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub view_options: BTreeMap<String, PropertyValue>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            page_size: 20,
            selected_filter_key: FilterKey::all(),
            sort_key: String::new(),
            sort_direction: SortDirection::Ascending,
            secondary_sort_key: None,
            secondary_sort_direction: None,
            columns: Vec::new(),
            view_options: BTreeMap::new(),
        }
    }
}

impl TableOptions {
    pub fn sort_spec(&self) -> SortSpec {
        SortSpec {
            sort_key: self.sort_key.clone(),
            sort_direction: self.sort_direction,
            secondary_sort_key: self.secondary_sort_key.clone(),
            secondary_sort_direction: self.secondary_sort_direction,
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }
}

/// Column state as it is written to storage: only what the user can
/// change. Labels and capabilities always come from the current schema.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PersistedColumn {
    pub name: String,
    pub is_visible: bool,
}

/// Stored shape of [`TableOptions`]. Every field is optional so that
/// values written by older or newer builds still load.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct PersistedOptions {
    pub page_size: Option<usize>,
    pub selected_filter_key: Option<FilterKey>,
    pub sort_key: Option<String>,
    pub sort_direction: Option<SortDirection>,
    pub secondary_sort_key: Option<String>,
    pub secondary_sort_direction: Option<SortDirection>,
    pub columns: Option<Vec<PersistedColumn>>,
    pub view_options: Option<BTreeMap<String, PropertyValue>>,
}

impl From<&TableOptions> for PersistedOptions {
    fn from(options: &TableOptions) -> Self {
        Self {
            page_size: Some(options.page_size),
            selected_filter_key: Some(options.selected_filter_key.clone()),
            sort_key: Some(options.sort_key.clone()),
            sort_direction: Some(options.sort_direction),
            secondary_sort_key: options.secondary_sort_key.clone(),
            secondary_sort_direction: options.secondary_sort_direction,
            columns: Some(
                options
                    .columns
                    .iter()
                    .map(|column| PersistedColumn {
                        name: column.name.clone(),
                        is_visible: column.is_visible,
                    })
                    .collect(),
            ),
            view_options: Some(options.view_options.clone()),
        }
    }
}
