use thiserror::Error;

/// Failures of the key-value substrate behind the options store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors returned by options store writes. The in-memory change has
/// already been applied when one of these is returned.
#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("Failed to persist options for `{name}`: {source}")]
    Persist {
        name: String,
        #[source]
        source: StorageError,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CustomFilterError {
    #[error("Custom filter repository error: {0}")]
    Repository(String),

    #[error("Custom filter not found: {0}")]
    NotFound(u32),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

pub type OptionsResult<T> = std::result::Result<T, OptionsError>;
pub type CustomFilterResult<T> = std::result::Result<T, CustomFilterError>;
