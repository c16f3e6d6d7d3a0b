//! Persisted, named view options.
//!
//! An [`OptionsStore`] is created once per view name with a factory for the
//! current default schema. On creation it loads whatever was stored under
//! that name and merges it into the defaults, so columns added or removed
//! since the value was written are reconciled. Every write goes straight
//! through to the [`OptionsStorage`] backend.

pub mod merge;
pub mod registry;
pub mod storage;
pub mod store;

pub use merge::{merge_columns, merge_options};
pub use registry::OptionsRegistry;
pub use storage::{JsonFileStorage, MemoryStorage, OptionsStorage};
pub use store::{OptionsField, OptionsPatch, OptionsStore};
