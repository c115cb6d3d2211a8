//! Versioned configuration store with a single active slot.

mod manager;
mod record;

pub use manager::ConfigManager;
pub use record::{validate_version, ConfigStatus, Versioned};
