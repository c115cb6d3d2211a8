//! Sorted catalog of entity snapshots.
//!
//! The catalog keeps at most one snapshot per identity, ordered by identity.

mod catalog;
mod entity;

pub use catalog::Catalog;
pub use entity::{validate_identity, Entity};
