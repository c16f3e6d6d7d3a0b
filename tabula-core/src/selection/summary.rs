use super::store::SelectionState;

/// Aggregate flags derived from a selection map. Never set directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionSummary {
    /// Non-empty, and every row is selected or disabled.
    pub all_selected: bool,
    /// Every row is unselected or disabled. True for an empty map.
    pub all_unselected: bool,
    pub any_selected: bool,
    pub selected_count: usize,
}

impl SelectionSummary {
    pub const EMPTY: SelectionSummary = SelectionSummary {
        all_selected: false,
        all_unselected: true,
        any_selected: false,
        selected_count: 0,
    };

    /// Disabled rows are exempt: they never block `all_selected` or
    /// `all_unselected`, and they are not counted as selected.
    pub fn compute<'a>(
        states: impl IntoIterator<Item = &'a SelectionState>,
    ) -> Self {
        let mut total = 0usize;
        let mut selected_count = 0usize;
        let mut blocking_select_all = 0usize;

        for state in states {
            total += 1;
            if state.is_disabled {
                continue;
            }
            if state.is_selected {
                selected_count += 1;
            } else {
                blocking_select_all += 1;
            }
        }

        SelectionSummary {
            all_selected: total > 0 && blocking_select_all == 0,
            all_unselected: selected_count == 0,
            any_selected: selected_count > 0,
            selected_count,
        }
    }
}

impl Default for SelectionSummary {
    fn default() -> Self {
        Self::EMPTY
    }
}
