//! Property-filter evaluation for table views.
//!
//! A view's active filter is either one of its predefined [`FilterSet`]s or
//! a user-authored [`CustomFilterSet`]. Every [`PropertyFilter`] of the set
//! must pass (logical AND). Each filter is evaluated by a per-field
//! predicate when one is registered in [`FilterPredicates`], otherwise by
//! reading the field off the row and applying the generic operator
//! semantics in [`operators`].
//!
//! [`FilterSet`]: tabula_model::FilterSet
//! [`CustomFilterSet`]: tabula_model::CustomFilterSet
//! [`PropertyFilter`]: tabula_model::PropertyFilter

pub mod engine;
pub mod operators;
pub mod predicates;

pub use engine::{FilterContext, FilterEngine, FilterOutcome};
pub use operators::{Operand, evaluate};
pub use predicates::{FilterPredicate, FilterPredicates};
