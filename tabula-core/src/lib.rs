//! # Tabula Core
//!
//! The state engine behind every list view of the media-library front end:
//! queue, history, blocklist, calendar, wanted, releases and the settings
//! tables all run through the same pieces.
//!
//! - [`selection`]: per-collection selection with shift-click ranges and
//!   disabled-row exemption
//! - [`filtering`]: predefined and custom filter sets evaluated through a
//!   per-field predicate table
//! - [`sorting`]: stable primary/secondary ordering through a per-field
//!   comparator table
//! - [`options`]: persisted view options with schema-evolving merge
//! - [`custom_filters`]: user-authored filter sets backed by a remote
//!   collection
//! - [`view`]: the facade a list view holds for its lifetime
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use tabula_core::{
//!     filtering::FilterEngine,
//!     options::{MemoryStorage, OptionsStore},
//!     sorting::SortEngine,
//!     view::TableView,
//! };
//! use tabula_model::prelude::*;
//!
//! let storage = Arc::new(MemoryStorage::default());
//! let options = OptionsStore::create(
//!     "queue",
//!     || TableOptions {
//!         sort_key: "title".into(),
//!         ..TableOptions::default()
//!     },
//!     storage,
//! );
//!
//! let mut view = TableView::new(
//!     options,
//!     FilterEngine::new(),
//!     SortEngine::new(),
//!     vec![FilterSet::new("all", "All")],
//! );
//! view.set_items(vec![
//!     Record::new(2).with("title", "Beta"),
//!     Record::new(1).with("title", "Alpha"),
//! ]);
//!
//! let titles: Vec<_> = view
//!     .visible()
//!     .iter()
//!     .filter_map(|row| row.property("title"))
//!     .collect();
//! assert_eq!(titles, vec!["Alpha".into(), "Beta".into()]);
//! ```
#![allow(missing_docs)]

pub mod config;
pub mod custom_filters;
pub mod error;
pub mod filtering;
pub mod options;
pub mod prelude;
pub mod selection;
pub mod sorting;
pub mod view;

pub use error::{ConfigError, CustomFilterError, OptionsError, StorageError};
pub use tabula_model as model;
