use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use crate::error::StorageError;

/// Key-value substrate the options stores persist into.
pub trait OptionsStorage: Send + Sync {
    /// The value stored under `name`, or `None` when nothing was written.
    fn get(&self, name: &str) -> Result<Option<Value>, StorageError>;

    fn set(&self, name: &str, value: &Value) -> Result<(), StorageError>;
}

/// Process-local storage. Values live as long as the instance.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.lock().is_empty()
    }
}

impl OptionsStorage for MemoryStorage {
    fn get(&self, name: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.values.lock().get(name).cloned())
    }

    fn set(&self, name: &str, value: &Value) -> Result<(), StorageError> {
        self.values.lock().insert(name.to_string(), value.clone());
        Ok(())
    }
}

/// One pretty-printed JSON file per store name under a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

impl OptionsStorage for JsonFileStorage {
    fn get(&self, name: &str) -> Result<Option<Value>, StorageError> {
        let path = self.path_for(name);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn set(&self, name: &str, value: &Value) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(name);
        let content = serde_json::to_string_pretty(value)?;
        fs::write(&path, content)?;
        debug!(path = %path.display(), "wrote view options");
        Ok(())
    }
}
