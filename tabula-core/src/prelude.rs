//! Everything a list view needs to build a [`TableView`].

pub use tabula_model::prelude::*;

pub use crate::config::EngineConfig;
pub use crate::custom_filters::{
    CustomFilterRepository, CustomFilterStore, InMemoryCustomFilterRepository,
};
pub use crate::error::{
    ConfigError, CustomFilterError, OptionsError, StorageError,
};
pub use crate::filtering::{
    FilterContext, FilterEngine, FilterOutcome, FilterPredicates, Operand,
};
pub use crate::options::{
    JsonFileStorage, MemoryStorage, OptionsField, OptionsPatch,
    OptionsRegistry, OptionsStorage, OptionsStore,
};
pub use crate::selection::{SelectionStore, SelectionSummary};
pub use crate::sorting::{SortComparators, SortEngine};
pub use crate::view::TableView;
