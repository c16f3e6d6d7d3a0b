use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tabula_model::TableOptions;

use super::storage::OptionsStorage;
use super::store::OptionsStore;

/// Process-wide lookup of options stores by view name.
///
/// Views register their store once with a defaults factory; later
/// registrations and lookups under the same name return the same shared
/// handle, so state survives navigating away from and back to a view.
pub struct OptionsRegistry {
    storage: Arc<dyn OptionsStorage>,
    key_prefix: String,
    default_page_size: Option<usize>,
    stores: RwLock<HashMap<String, OptionsStore>>,
}

impl fmt::Debug for OptionsRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> =
            self.stores.read().keys().cloned().collect();
        names.sort();
        f.debug_struct("OptionsRegistry")
            .field("key_prefix", &self.key_prefix)
            .field("default_page_size", &self.default_page_size)
            .field("stores", &names)
            .finish()
    }
}

impl OptionsRegistry {
    pub fn new(storage: Arc<dyn OptionsStorage>) -> Self {
        Self {
            storage,
            key_prefix: String::new(),
            default_page_size: None,
            stores: RwLock::new(HashMap::new()),
        }
    }

    /// Prefix prepended to every view name to form its storage key.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Page size given to every registered view in place of the one its
    /// defaults factory returns. Stored page sizes still win.
    pub fn with_default_page_size(mut self, page_size: usize) -> Self {
        self.default_page_size = Some(page_size).filter(|size| *size > 0);
        self
    }

    /// Create the store for `name`, or return the existing one. The
    /// factory is only called on first registration.
    pub fn register(
        &self,
        name: &str,
        defaults: impl FnOnce() -> TableOptions,
    ) -> OptionsStore {
        if let Some(existing) = self.try_get(name) {
            return existing;
        }

        let mut stores = self.stores.write();
        stores
            .entry(name.to_string())
            .or_insert_with(|| {
                let page_size = self.default_page_size;
                OptionsStore::create(
                    format!("{}{}", self.key_prefix, name),
                    move || {
                        let mut options = defaults();
                        if let Some(page_size) = page_size {
                            options.page_size = page_size;
                        }
                        options
                    },
                    self.storage.clone(),
                )
            })
            .clone()
    }

    /// The store registered under `name`.
    ///
    /// # Panics
    ///
    /// Panics when no store was registered under `name`.
    pub fn get(&self, name: &str) -> OptionsStore {
        self.try_get(name).unwrap_or_else(|| {
            panic!("options store `{name}` was never registered")
        })
    }

    pub fn try_get(&self, name: &str) -> Option<OptionsStore> {
        self.stores.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.stores.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.stores.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.read().is_empty()
    }
}
