//! The per-view facade over filtering, sorting, options and selection.

use tabula_model::{
    CustomFilterSet, FilterKey, FilterSet, ItemId, SortDirection, TableItem,
};
use tracing::debug;

use crate::error::OptionsResult;
use crate::filtering::{FilterEngine, FilterOutcome};
use crate::options::{OptionsField, OptionsStore};
use crate::selection::SelectionStore;
use crate::sorting::SortEngine;

/// State behind one list view for as long as it is open.
///
/// Owns the fetched rows and derives the visible rows from the filter and
/// sort currently held in its [`OptionsStore`]. The selection store always
/// covers the visible rows in display order, so shift-click ranges follow
/// what the user sees. Pages are 1-based.
#[derive(Debug)]
pub struct TableView<T> {
    items: Vec<T>,
    filters: FilterEngine<T>,
    sorter: SortEngine<T>,
    predefined: Vec<FilterSet>,
    custom: Vec<CustomFilterSet>,
    options: OptionsStore,
    selection: SelectionStore,
    page: usize,
}

impl<T: TableItem> TableView<T> {
    pub fn new(
        options: OptionsStore,
        filters: FilterEngine<T>,
        sorter: SortEngine<T>,
        predefined: Vec<FilterSet>,
    ) -> Self {
        Self {
            items: Vec::new(),
            filters,
            sorter,
            predefined,
            custom: Vec::new(),
            options,
            selection: SelectionStore::new(),
            page: 1,
        }
    }

    /// Replace the collection, as after a fetch.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.page = self.page.min(self.total_pages());
        self.reseed_selection();
    }

    /// Replace the custom filter sets this view can select from.
    pub fn set_custom_filters(&mut self, sets: Vec<CustomFilterSet>) {
        self.custom = sets;
        self.page = self.page.min(self.total_pages());
        self.reseed_selection();
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn options(&self) -> &OptionsStore {
        &self.options
    }

    pub fn predefined_filters(&self) -> &[FilterSet] {
        &self.predefined
    }

    pub fn custom_filters(&self) -> &[CustomFilterSet] {
        &self.custom
    }

    /// Rows passing the selected filter, before sorting.
    pub fn filter_outcome(&self) -> FilterOutcome<'_, T> {
        let key = self.options.selected_filter_key();
        self.filters
            .apply(&self.items, Some(&key), &self.predefined, &self.custom)
    }

    /// Filtered, then sorted, rows.
    pub fn visible(&self) -> Vec<&T> {
        let outcome = self.filter_outcome();
        self.sorter
            .sort(outcome.into_items(), &self.options.sort_spec())
    }

    pub fn select_filter(
        &mut self,
        key: impl Into<FilterKey>,
    ) -> OptionsResult<()> {
        let key = key.into();
        debug!(view = self.options.name(), key = %key, "filter selected");
        let written = self
            .options
            .write_field(OptionsField::SelectedFilterKey(key));
        self.page = 1;
        self.reseed_selection();
        written
    }

    /// Sort by `key`. Without a direction, re-sorting by the current key
    /// flips it and a new key sorts ascending.
    pub fn sort_by(
        &mut self,
        key: &str,
        direction: Option<SortDirection>,
    ) -> OptionsResult<()> {
        let written = self.options.write_sort(key, direction);
        let spec = self.options.sort_spec();
        debug!(
            view = self.options.name(),
            key = %spec.sort_key,
            direction = %spec.sort_direction,
            "sort changed"
        );
        self.reseed_selection();
        written
    }

    /// Sort by a column header click. Columns that are not sortable are
    /// ignored; a fixed sort direction is always applied as-is. Returns
    /// whether the sort changed.
    pub fn sort_by_column(&mut self, name: &str) -> OptionsResult<bool> {
        let Some(column) = self.options.read().column(name).cloned() else {
            return Ok(false);
        };
        if !column.is_sortable {
            return Ok(false);
        }
        self.sort_by(&column.name, column.fixed_sort_direction)?;
        Ok(true)
    }

    /// Change the page size. Zero is treated as one.
    pub fn set_page_size(&mut self, page_size: usize) -> OptionsResult<()> {
        let written = self
            .options
            .write_field(OptionsField::PageSize(page_size.max(1)));
        self.page = 1;
        written
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Jump to `page`, clamped to the available pages.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages());
    }

    /// Number of pages over the visible rows; at least one.
    pub fn total_pages(&self) -> usize {
        let page_size = self.options.page_size().max(1);
        self.filter_outcome().len().div_ceil(page_size).max(1)
    }

    /// The visible rows of the current page.
    pub fn page_items(&self) -> Vec<&T> {
        let page_size = self.options.page_size().max(1);
        self.visible()
            .into_iter()
            .skip((self.page - 1) * page_size)
            .take(page_size)
            .collect()
    }

    /// Selected rows, in display order.
    pub fn selected_items(&self) -> Vec<&T> {
        let selected = self.selection.selected_ids();
        self.visible()
            .into_iter()
            .filter(|item| selected.contains(&item.id()))
            .collect()
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionStore {
        &mut self.selection
    }

    fn reseed_selection(&mut self) {
        let ids: Vec<ItemId> =
            self.visible().iter().map(|item| item.id()).collect();
        self.selection.initialize_ids(ids);
    }
}
