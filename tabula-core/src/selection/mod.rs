//! Row selection for table views.
//!
//! A [`SelectionStore`] tracks `{is_selected, is_disabled}` per row id for
//! exactly one collection. Shift-click ranges are resolved against the
//! collection's current ordering by [`resolve_range`], and the aggregate
//! flags in [`SelectionSummary`] are recomputed after every change.

pub mod range;
pub mod store;
pub mod summary;

pub use range::{ToggleRange, resolve_range};
pub use store::{ListenerId, SelectionState, SelectionStore};
pub use summary::SelectionSummary;
