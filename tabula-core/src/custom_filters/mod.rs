//! User-authored filter sets kept in a remote collection.

pub mod repository;
pub mod store;

pub use repository::{CustomFilterRepository, InMemoryCustomFilterRepository};
pub use store::CustomFilterStore;
