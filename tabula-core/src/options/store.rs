use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value};
use tabula_model::{
    Column, FilterKey, PersistedOptions, PropertyValue, SortDirection,
    SortSpec, TableOptions,
};
use tracing::{debug, warn};

use super::merge::merge_options;
use super::storage::OptionsStorage;
use crate::error::{OptionsError, OptionsResult, StorageError};

/// Partial update applied by [`OptionsStore::write_all`]. Fields left as
/// `None` keep their current value; present fields replace it wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionsPatch {
    pub page_size: Option<usize>,
    pub selected_filter_key: Option<FilterKey>,
    pub sort_key: Option<String>,
    pub sort_direction: Option<SortDirection>,
    pub secondary_sort_key: Option<String>,
    pub secondary_sort_direction: Option<SortDirection>,
    pub columns: Option<Vec<Column>>,
    pub view_options: Option<BTreeMap<String, PropertyValue>>,
}

impl OptionsPatch {
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn selected_filter_key(mut self, key: impl Into<FilterKey>) -> Self {
        self.selected_filter_key = Some(key.into());
        self
    }

    pub fn sort(
        mut self,
        sort_key: impl Into<String>,
        direction: SortDirection,
    ) -> Self {
        self.sort_key = Some(sort_key.into());
        self.sort_direction = Some(direction);
        self
    }

    pub fn columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = Some(columns);
        self
    }

    fn apply(self, options: &mut TableOptions) {
        if let Some(page_size) = self.page_size {
            options.page_size = page_size;
        }
        if let Some(key) = self.selected_filter_key {
            options.selected_filter_key = key;
        }
        if let Some(sort_key) = self.sort_key {
            options.sort_key = sort_key;
        }
        if let Some(direction) = self.sort_direction {
            options.sort_direction = direction;
        }
        if let Some(key) = self.secondary_sort_key {
            options.secondary_sort_key = Some(key);
        }
        if let Some(direction) = self.secondary_sort_direction {
            options.secondary_sort_direction = Some(direction);
        }
        if let Some(columns) = self.columns {
            options.columns = columns;
        }
        if let Some(view_options) = self.view_options {
            options.view_options = view_options;
        }
    }
}

/// A single-field write for [`OptionsStore::write_field`].
#[derive(Debug, Clone, PartialEq)]
pub enum OptionsField {
    PageSize(usize),
    SelectedFilterKey(FilterKey),
    SortKey(String),
    SortDirection(SortDirection),
    SecondarySortKey(Option<String>),
    SecondarySortDirection(Option<SortDirection>),
    Columns(Vec<Column>),
    ViewOption(String, PropertyValue),
}

impl OptionsField {
    fn apply(self, options: &mut TableOptions) {
        match self {
            OptionsField::PageSize(size) => options.page_size = size,
            OptionsField::SelectedFilterKey(key) => {
                options.selected_filter_key = key
            }
            OptionsField::SortKey(key) => options.sort_key = key,
            OptionsField::SortDirection(direction) => {
                options.sort_direction = direction
            }
            OptionsField::SecondarySortKey(key) => {
                options.secondary_sort_key = key
            }
            OptionsField::SecondarySortDirection(direction) => {
                options.secondary_sort_direction = direction
            }
            OptionsField::Columns(columns) => options.columns = columns,
            OptionsField::ViewOption(key, value) => {
                options.view_options.insert(key, value);
            }
        }
    }
}

struct Shared {
    name: String,
    options: RwLock<TableOptions>,
    storage: Arc<dyn OptionsStorage>,
}

/// Handle to the options of one named view. Clones share state.
///
/// Every mutation is applied in memory first and then written through to
/// storage. A failed write is returned as [`OptionsError::Persist`]; the
/// in-memory change is kept.
#[derive(Clone)]
pub struct OptionsStore {
    shared: Arc<Shared>,
}

impl fmt::Debug for OptionsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionsStore")
            .field("name", &self.shared.name)
            .field("options", &*self.shared.options.read())
            .finish()
    }
}

impl OptionsStore {
    /// Load the options stored under `name` and merge them over the
    /// defaults. Unreadable or undecodable values are logged and ignored.
    pub fn create(
        name: impl Into<String>,
        defaults: impl FnOnce() -> TableOptions,
        storage: Arc<dyn OptionsStorage>,
    ) -> Self {
        let name = name.into();
        let persisted = load_persisted(&name, storage.as_ref());
        let options = merge_options(defaults(), persisted);
        debug!(
            name = %name,
            columns = options.columns.len(),
            "options store created"
        );

        Self {
            shared: Arc::new(Shared {
                name,
                options: RwLock::new(options),
                storage,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Snapshot of the current options.
    pub fn read(&self) -> TableOptions {
        self.shared.options.read().clone()
    }

    pub fn page_size(&self) -> usize {
        self.shared.options.read().page_size
    }

    pub fn selected_filter_key(&self) -> FilterKey {
        self.shared.options.read().selected_filter_key.clone()
    }

    pub fn sort_spec(&self) -> SortSpec {
        self.shared.options.read().sort_spec()
    }

    pub fn columns(&self) -> Vec<Column> {
        self.shared.options.read().columns.clone()
    }

    pub fn view_option(&self, key: &str) -> Option<PropertyValue> {
        self.shared.options.read().view_options.get(key).cloned()
    }

    pub fn write_all(&self, patch: OptionsPatch) -> OptionsResult<()> {
        self.update(|options| patch.apply(options))
    }

    pub fn write_field(&self, field: OptionsField) -> OptionsResult<()> {
        self.update(|options| field.apply(options))
    }

    /// Change the primary sort.
    ///
    /// An explicit direction is always used. Without one, re-selecting the
    /// current key flips its direction and a new key sorts ascending.
    pub fn write_sort(
        &self,
        sort_key: impl Into<String>,
        direction: Option<SortDirection>,
    ) -> OptionsResult<()> {
        let sort_key = sort_key.into();
        self.update(|options| {
            let direction = direction.unwrap_or_else(|| {
                if options.sort_key == sort_key {
                    options.sort_direction.reverse()
                } else {
                    SortDirection::Ascending
                }
            });
            options.sort_key = sort_key;
            options.sort_direction = direction;
        })
    }

    /// Show or hide a column. Columns that are not modifiable, and names
    /// not in the layout, are left alone and nothing is written. Returns
    /// whether the layout changed.
    pub fn set_column_visible(
        &self,
        name: &str,
        visible: bool,
    ) -> OptionsResult<bool> {
        {
            let options = self.shared.options.read();
            let Some(column) = options.column(name) else {
                return Ok(false);
            };
            if !column.is_modifiable || column.is_visible == visible {
                return Ok(false);
            }
        }

        self.update(|options| {
            if let Some(column) =
                options.columns.iter_mut().find(|column| column.name == name)
            {
                column.is_visible = visible;
            }
        })?;
        Ok(true)
    }

    /// Move the column at `from` to index `to`, clamped to the layout.
    pub fn move_column(&self, from: usize, to: usize) -> OptionsResult<()> {
        if from >= self.shared.options.read().columns.len() || from == to {
            return Ok(());
        }
        self.update(|options| {
            let column = options.columns.remove(from);
            let to = to.min(options.columns.len());
            options.columns.insert(to, column);
        })
    }

    fn update(
        &self,
        mutate: impl FnOnce(&mut TableOptions),
    ) -> OptionsResult<()> {
        let snapshot = {
            let mut options = self.shared.options.write();
            mutate(&mut options);
            PersistedOptions::from(&*options)
        };
        self.persist(&snapshot)
    }

    fn persist(&self, snapshot: &PersistedOptions) -> OptionsResult<()> {
        let name = &self.shared.name;
        let result = serde_json::to_value(snapshot)
            .map_err(StorageError::from)
            .and_then(|value| self.shared.storage.set(name, &value));

        result.map_err(|source| {
            warn!(name = %name, error = %source, "failed to persist options");
            OptionsError::Persist {
                name: name.clone(),
                source,
            }
        })
    }
}

fn load_persisted(
    name: &str,
    storage: &dyn OptionsStorage,
) -> Option<PersistedOptions> {
    let value = match storage.get(name) {
        Ok(value) => value?,
        Err(error) => {
            warn!(name = %name, error = %error, "failed to read options");
            return None;
        }
    };

    decode_persisted(name, value)
}

/// Decode stored options one field at a time, so a single bad field only
/// loses that field.
fn decode_persisted(name: &str, value: Value) -> Option<PersistedOptions> {
    let Value::Object(fields) = value else {
        warn!(
            name = %name,
            "stored options are not an object, using defaults"
        );
        return None;
    };

    let mut kept = Map::new();
    for (key, field) in fields {
        let single = Value::Object(Map::from_iter([(key.clone(), field)]));
        match serde_json::from_value::<PersistedOptions>(single.clone()) {
            Ok(_) => {
                if let Value::Object(single) = single {
                    kept.extend(single);
                }
            }
            Err(error) => warn!(
                name = %name,
                field = %key,
                error = %error,
                "dropping undecodable stored option"
            ),
        }
    }

    match serde_json::from_value::<PersistedOptions>(Value::Object(kept)) {
        Ok(persisted) => Some(persisted),
        Err(error) => {
            warn!(
                name = %name,
                error = %error,
                "stored options could not be decoded, using defaults"
            );
            None
        }
    }
}
