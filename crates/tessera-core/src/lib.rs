//! Tessera Core - Snapshot catalog and versioned configuration store.
//!
//! This crate provides two single-owner containers that hand out frozen
//! snapshots of their contents:
//!
//! - [`Catalog`]: entities kept sorted by a positive integer identity.
//! - [`ConfigManager`]: config records keyed by version, at most one active.

pub mod catalog;
pub mod config;
pub mod error;
pub mod snapshot;

pub use catalog::{validate_identity, Catalog, Entity};
pub use config::{validate_version, ConfigManager, ConfigStatus, Versioned};
pub use error::{Error, Result};
pub use snapshot::{find_index, insertion_index, Snapshot};
