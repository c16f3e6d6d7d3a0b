use crate::sort::SortDirection;

/// A named, orderable, visibility-toggleable field of a table view.
///
/// Order within a view's column list is meaningful and persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Column {
    pub name: String,
    pub label: String,
    pub is_visible: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_sortable: bool,
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub is_modifiable: bool,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub fixed_sort_direction: Option<SortDirection>,
}

#[cfg(feature = "serde")]
fn default_true() -> bool {
    true
}

impl Column {
    /// A visible, modifiable, unsortable column.
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            is_visible: true,
            is_sortable: false,
            is_modifiable: true,
            fixed_sort_direction: None,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.is_sortable = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.is_visible = false;
        self
    }

    /// Pins the column in place: its visibility can no longer be toggled.
    pub fn locked(mut self) -> Self {
        self.is_modifiable = false;
        self
    }

    pub fn fixed_direction(mut self, direction: SortDirection) -> Self {
        self.is_sortable = true;
        self.fixed_sort_direction = Some(direction);
        self
    }
}
