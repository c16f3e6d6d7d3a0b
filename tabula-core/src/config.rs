use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::options::{JsonFileStorage, OptionsRegistry};

const APP_DIR: &str = "tabula";
const CONFIG_FILE: &str = "config.json";

/// Where and how view options are stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub options_dir: PathBuf,
    pub default_page_size: usize,
    pub storage_key_prefix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let options_dir = dirs::data_dir()
            .map(|dir| dir.join(APP_DIR).join("options"))
            .unwrap_or_else(|| PathBuf::from("tabula-options"));
        Self {
            options_dir,
            default_page_size: 20,
            storage_key_prefix: String::new(),
        }
    }
}

impl EngineConfig {
    /// Defaults, then `<config_dir>/tabula/config.json` when it exists,
    /// then `TABULA_OPTIONS_DIR` and `TABULA_PAGE_SIZE` from the
    /// environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str::<EngineConfig>(&content)?;
        debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(dir) = lookup("TABULA_OPTIONS_DIR")
            && !dir.is_empty()
        {
            self.options_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup("TABULA_PAGE_SIZE") {
            self.default_page_size = match raw.trim().parse::<usize>() {
                Ok(size) if size > 0 => size,
                _ => {
                    warn!(value = %raw, "ignoring invalid TABULA_PAGE_SIZE");
                    return Err(ConfigError::InvalidValue {
                        key: "TABULA_PAGE_SIZE",
                        value: raw,
                    });
                }
            };
        }
        Ok(())
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(path) = Self::config_path() {
            self.save_to(&path)?;
        }
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    pub fn storage(&self) -> JsonFileStorage {
        JsonFileStorage::new(&self.options_dir)
    }

    pub fn storage_key(&self, name: &str) -> String {
        format!("{}{}", self.storage_key_prefix, name)
    }

    /// A registry persisting into [`Self::storage`] under the configured
    /// key prefix, handing out the configured default page size.
    pub fn registry(&self) -> OptionsRegistry {
        OptionsRegistry::new(std::sync::Arc::new(self.storage()))
            .with_key_prefix(self.storage_key_prefix.clone())
            .with_default_page_size(self.default_page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut config = EngineConfig::default();
        config
            .apply_env(env(&[
                ("TABULA_OPTIONS_DIR", "/srv/tabula"),
                ("TABULA_PAGE_SIZE", "50"),
            ]))
            .unwrap();

        assert_eq!(config.options_dir, PathBuf::from("/srv/tabula"));
        assert_eq!(config.default_page_size, 50);
    }

    #[test]
    fn invalid_page_size_is_rejected() {
        let mut config = EngineConfig::default();
        let err = config
            .apply_env(env(&[("TABULA_PAGE_SIZE", "zero")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "TABULA_PAGE_SIZE",
                ..
            }
        ));
        assert_eq!(config.default_page_size, 20);
    }

    #[test]
    fn save_and_reload_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tabula").join("config.json");
        let config = EngineConfig {
            options_dir: tmp.path().join("options"),
            default_page_size: 100,
            storage_key_prefix: "v2.".into(),
        };

        config.save_to(&path).unwrap();
        let loaded = EngineConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.storage_key("queue"), "v2.queue");
        assert_eq!(loaded.storage().dir(), tmp.path().join("options"));
    }

    #[test]
    fn registry_hands_out_the_configured_page_size() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = EngineConfig {
            options_dir: tmp.path().to_path_buf(),
            ..EngineConfig::default()
        };
        config.apply_env(env(&[("TABULA_PAGE_SIZE", "75")])).unwrap();

        let queue = config
            .registry()
            .register("queue", tabula_model::TableOptions::default);
        assert_eq!(queue.page_size(), 75);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{ "default_page_size": 10 }"#).unwrap();

        let loaded = EngineConfig::from_file(&path).unwrap();
        assert_eq!(loaded.default_page_size, 10);
        assert_eq!(loaded.storage_key_prefix, "");
    }
}
