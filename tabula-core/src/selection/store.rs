use std::collections::HashMap;
use std::fmt;

use tabula_model::{ItemId, TableItem};
use tracing::{debug, trace};

use super::range::{ToggleRange, resolve_range};
use super::summary::SelectionSummary;

/// Per-row selection flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionState {
    pub is_selected: bool,
    pub is_disabled: bool,
}

/// Handle returned by [`SelectionStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&SelectionSummary) + Send>;

/// Selection state of one collection, scoped to the view that owns it.
///
/// Operations naming an id the store does not know are silent no-ops:
/// selection is a UI affordance, not a source of truth.
pub struct SelectionStore {
    order: Vec<ItemId>,
    entries: HashMap<ItemId, SelectionState>,
    anchor: Option<ItemId>,
    summary: SelectionSummary,
    revision: u64,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl fmt::Debug for SelectionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionStore")
            .field("rows", &self.order.len())
            .field("anchor", &self.anchor)
            .field("summary", &self.summary)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionStore {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            entries: HashMap::new(),
            anchor: None,
            summary: SelectionSummary::EMPTY,
            revision: 0,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn with_items<T: TableItem>(items: &[T]) -> Self {
        let mut store = Self::new();
        store.initialize(items);
        store
    }

    /// Re-seed from a new collection. Rows present before keep their
    /// flags, new rows start unselected and enabled, vanished rows are
    /// dropped. The shift-click anchor is cleared.
    pub fn initialize<T: TableItem>(&mut self, items: &[T]) {
        self.initialize_ids(items.iter().map(TableItem::id));
    }

    pub fn initialize_ids(&mut self, ids: impl IntoIterator<Item = ItemId>) {
        let mut previous = std::mem::take(&mut self.entries);
        let order: Vec<ItemId> = ids.into_iter().collect();

        let mut entries = HashMap::with_capacity(order.len());
        let mut carried = 0usize;
        for id in &order {
            let state = match previous.remove(id) {
                Some(state) => {
                    carried += 1;
                    state
                }
                None => SelectionState::default(),
            };
            entries.insert(id.clone(), state);
        }

        trace!(
            rows = order.len(),
            carried,
            dropped = previous.len(),
            "selection re-seeded"
        );

        self.order = order;
        self.entries = entries;
        self.anchor = None;
        self.refresh();
    }

    /// Set the selection flag of one row.
    ///
    /// `None` removes the row from the map entirely (row unmount). With
    /// `shift_key` and an existing anchor, every enabled row strictly
    /// between the anchor and `id` in the current ordering receives the
    /// same flag. The anchor keeps whatever flag it already has.
    pub fn toggle_selected(
        &mut self,
        id: &ItemId,
        is_selected: Option<bool>,
        shift_key: bool,
    ) {
        let Some(is_selected) = is_selected else {
            if self.entries.remove(id).is_some() {
                self.refresh();
            }
            return;
        };

        match self.entries.get_mut(id) {
            Some(entry) if entry.is_disabled => return,
            Some(entry) => entry.is_selected = is_selected,
            None => {
                trace!(%id, "toggle for unknown row ignored");
                return;
            }
        }

        let range = if shift_key {
            self.anchor
                .as_ref()
                .and_then(|anchor| resolve_range(&self.order, anchor, id))
        } else {
            None
        };
        if let Some(range) = range {
            self.apply_range(range, is_selected);
        }

        self.anchor = Some(id.clone());
        self.refresh();
    }

    /// Drop a row's entry, as when the row unmounts.
    pub fn forget(&mut self, id: &ItemId) {
        self.toggle_selected(id, None, false);
    }

    pub fn select_all(&mut self) {
        self.set_all(true);
    }

    pub fn unselect_all(&mut self) {
        self.set_all(false);
    }

    /// Update only the disabled flag of an existing row.
    pub fn toggle_disabled(&mut self, id: &ItemId, is_disabled: bool) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.is_disabled = is_disabled;
            self.refresh();
        }
    }

    /// Ids of enabled, selected rows in collection order.
    pub fn selected_ids(&self) -> Vec<ItemId> {
        self.order
            .iter()
            .filter(|id| {
                self.entries
                    .get(*id)
                    .is_some_and(|s| s.is_selected && !s.is_disabled)
            })
            .cloned()
            .collect()
    }

    pub fn is_selected(&self, id: &ItemId) -> bool {
        self.entries.get(id).is_some_and(|s| s.is_selected)
    }

    pub fn is_disabled(&self, id: &ItemId) -> bool {
        self.entries.get(id).is_some_and(|s| s.is_disabled)
    }

    pub fn state(&self, id: &ItemId) -> Option<SelectionState> {
        self.entries.get(id).copied()
    }

    pub fn anchor(&self) -> Option<&ItemId> {
        self.anchor.as_ref()
    }

    pub fn summary(&self) -> SelectionSummary {
        self.summary
    }

    pub fn all_selected(&self) -> bool {
        self.summary.all_selected
    }

    pub fn all_unselected(&self) -> bool {
        self.summary.all_unselected
    }

    pub fn any_selected(&self) -> bool {
        self.summary.any_selected
    }

    pub fn selected_count(&self) -> usize {
        self.summary.selected_count
    }

    /// Number of times the summary has changed.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register a listener called with the new summary whenever it changes.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&SelectionSummary) + Send + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn set_all(&mut self, is_selected: bool) {
        for entry in self.entries.values_mut() {
            if !entry.is_disabled {
                entry.is_selected = is_selected;
            }
        }
        self.anchor = None;
        self.refresh();
    }

    fn apply_range(&mut self, range: ToggleRange, is_selected: bool) {
        debug!(
            lower = range.lower,
            upper = range.upper,
            is_selected,
            "applying shift-click range"
        );
        for idx in range.interior() {
            let Some(id) = self.order.get(idx) else {
                break;
            };
            if let Some(entry) = self.entries.get_mut(id)
                && !entry.is_disabled
            {
                entry.is_selected = is_selected;
            }
        }
    }

    fn refresh(&mut self) {
        let summary = SelectionSummary::compute(self.entries.values());
        if summary == self.summary {
            return;
        }
        self.summary = summary;
        self.revision += 1;
        for (_, listener) in self.listeners.iter_mut() {
            listener(&summary);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tabula_model::Record;

    fn rows(ids: &[&str]) -> Vec<Record> {
        ids.iter().map(|id| Record::new(*id)).collect()
    }

    fn id(raw: &str) -> ItemId {
        ItemId::from(raw)
    }

    fn selected(store: &SelectionStore) -> Vec<String> {
        store
            .selected_ids()
            .into_iter()
            .map(|id| id.to_string())
            .collect()
    }

    #[test]
    fn select_all_marks_every_row() {
        let mut store = SelectionStore::with_items(&rows(&["a", "b", "c"]));
        store.select_all();

        assert!(store.all_selected());
        assert!(!store.all_unselected());
        assert!(store.any_selected());
        assert_eq!(store.selected_count(), 3);
    }

    #[test]
    fn unselect_all_holds_with_disabled_rows() {
        let mut store = SelectionStore::with_items(&rows(&["a", "b", "c"]));
        store.toggle_selected(&id("b"), Some(true), false);
        store.toggle_disabled(&id("b"), true);
        store.select_all();
        store.unselect_all();

        assert!(store.all_unselected());
        // The disabled row keeps its flag.
        assert!(store.is_selected(&id("b")));
        assert_eq!(store.selected_count(), 0);
    }

    #[test]
    fn disabled_rows_ignore_toggles() {
        let mut store = SelectionStore::with_items(&rows(&["a", "b", "c"]));
        store.toggle_disabled(&id("b"), true);

        store.toggle_selected(&id("b"), Some(true), false);
        assert!(!store.is_selected(&id("b")));

        store.toggle_selected(&id("a"), Some(true), false);
        store.toggle_selected(&id("b"), Some(true), true);
        assert!(!store.is_selected(&id("b")));
        // Anchor stays on the last row that actually toggled.
        assert_eq!(store.anchor(), Some(&id("a")));
    }

    #[test]
    fn shift_click_selects_anchor_through_target() {
        let mut store =
            SelectionStore::with_items(&rows(&["a", "b", "c", "d", "e"]));
        store.toggle_selected(&id("a"), Some(true), false);
        store.toggle_selected(&id("d"), Some(true), true);

        assert_eq!(selected(&store), vec!["a", "b", "c", "d"]);
        assert!(!store.is_selected(&id("e")));
        assert_eq!(store.anchor(), Some(&id("d")));
    }

    #[test]
    fn shift_click_backwards_fills_the_gap() {
        let mut store =
            SelectionStore::with_items(&rows(&["a", "b", "c", "d", "e"]));
        store.toggle_selected(&id("e"), Some(true), false);
        store.toggle_selected(&id("b"), Some(true), true);

        assert_eq!(selected(&store), vec!["b", "c", "d", "e"]);
    }

    #[test]
    fn shift_click_leaves_the_anchor_flag_alone() {
        let mut store =
            SelectionStore::with_items(&rows(&["a", "b", "c", "d", "e"]));
        store.select_all();
        store.toggle_selected(&id("e"), Some(true), false);
        store.toggle_selected(&id("b"), Some(false), true);

        assert_eq!(selected(&store), vec!["a", "e"]);
        assert_eq!(store.anchor(), Some(&id("b")));
    }

    #[test]
    fn shift_click_skips_disabled_rows_in_range() {
        let mut store =
            SelectionStore::with_items(&rows(&["a", "b", "c", "d"]));
        store.toggle_disabled(&id("b"), true);
        store.toggle_selected(&id("a"), Some(true), false);
        store.toggle_selected(&id("d"), Some(true), true);

        assert_eq!(selected(&store), vec!["a", "c", "d"]);
        assert!(!store.is_selected(&id("b")));
    }

    #[test]
    fn shift_click_without_anchor_is_a_plain_toggle() {
        let mut store = SelectionStore::with_items(&rows(&["a", "b", "c"]));
        store.toggle_selected(&id("c"), Some(true), true);
        assert_eq!(selected(&store), vec!["c"]);

        store.select_all();
        assert_eq!(store.anchor(), None);
        store.toggle_selected(&id("a"), Some(false), true);
        assert_eq!(selected(&store), vec!["b", "c"]);
    }

    #[test]
    fn reseed_carries_state_by_id() {
        let mut store = SelectionStore::with_items(&rows(&["a", "b", "c"]));
        store.toggle_selected(&id("a"), Some(true), false);
        store.toggle_disabled(&id("b"), true);
        store.toggle_selected(&id("c"), Some(true), false);

        store.initialize(&rows(&["b", "a", "d"]));

        assert_eq!(
            store.state(&id("a")),
            Some(SelectionState {
                is_selected: true,
                is_disabled: false
            })
        );
        assert!(store.is_disabled(&id("b")));
        assert_eq!(store.state(&id("c")), None);
        assert_eq!(store.state(&id("d")), Some(SelectionState::default()));
        assert_eq!(store.anchor(), None);
        assert_eq!(selected(&store), vec!["a"]);
    }

    #[test]
    fn none_removes_the_entry() {
        let mut store = SelectionStore::with_items(&rows(&["a", "b"]));
        store.toggle_selected(&id("a"), Some(true), false);
        store.forget(&id("a"));

        assert_eq!(store.len(), 1);
        assert_eq!(store.state(&id("a")), None);
        assert!(store.all_unselected());
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut store = SelectionStore::with_items(&rows(&["a"]));
        let revision = store.revision();
        store.toggle_selected(&id("zz"), Some(true), true);
        store.toggle_disabled(&id("zz"), true);

        assert_eq!(store.revision(), revision);
        assert_eq!(store.anchor(), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn listeners_only_fire_on_summary_change() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut store = SelectionStore::with_items(&rows(&["a", "b"]));
        let listener = store.subscribe(move |summary| {
            sink.lock().unwrap().push(summary.selected_count);
        });

        store.toggle_selected(&id("a"), Some(true), false);
        store.toggle_selected(&id("a"), Some(true), false);
        store.select_all();
        store.select_all();

        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);

        assert!(store.unsubscribe(listener));
        store.unselect_all();
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn empty_store_reports_vacuous_aggregates() {
        let mut store = SelectionStore::new();
        store.select_all();
        assert!(!store.all_selected());
        assert!(store.all_unselected());
        assert_eq!(store.selected_count(), 0);
    }
}
