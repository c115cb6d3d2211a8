//! Config manager for storing versions and swapping the active one.

use std::collections::BTreeMap;

use super::record::{validate_version, ConfigStatus, Versioned};
use crate::error::{Error, Result};
use crate::snapshot::Snapshot;

/// A store of versioned config records with at most one active record.
///
/// Records are held once, as snapshots. Reads hand out clones of those
/// snapshots; a status change rebuilds the affected snapshots instead of
/// editing them in place, so values already handed out never change.
#[derive(Debug, Clone)]
pub struct ConfigManager<C> {
    /// Records keyed by version.
    records: BTreeMap<i64, Snapshot<C>>,
    /// Version of the active record, if any.
    active: Option<i64>,
}

impl<C> Default for ConfigManager<C> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
            active: None,
        }
    }
}

impl<C: Versioned + Clone> ConfigManager<C> {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new config record.
    ///
    /// A record submitted as active becomes the active record, provided no
    /// other record is active. Nothing is stored on error.
    pub fn add(&mut self, config: &C) -> Result<Snapshot<C>> {
        let version = validate_version(config.version())?;
        let status = config.status();

        if status.is_active() {
            if let Some(active) = self.active {
                return Err(Error::ActiveAlreadyExists { active });
            }
        }
        if self.records.contains_key(&version) {
            return Err(Error::DuplicateVersion(version));
        }

        let snapshot = Snapshot::capture(config);
        self.records.insert(version, snapshot.clone());
        if status.is_active() {
            self.active = Some(version);
        }

        tracing::debug!(version, %status, "config added");
        Ok(snapshot)
    }

    /// Replace the non-status fields of an existing record.
    ///
    /// Returns `Ok(None)` if the version is not stored. The submitted status
    /// must match the stored one; use [`ConfigManager::activate`] to change it.
    pub fn update(&mut self, config: &C) -> Result<Option<Snapshot<C>>> {
        let version = validate_version(config.version())?;
        let Some(stored) = self.records.get(&version) else {
            return Ok(None);
        };

        if stored.status() != config.status() {
            return Err(Error::ImmutableFieldViolation { field: "status" });
        }

        let snapshot = Snapshot::capture(config);
        self.records.insert(version, snapshot.clone());

        tracing::debug!(version, "config updated");
        Ok(Some(snapshot))
    }

    /// Remove an inactive record, returning it if it was present.
    pub fn remove(&mut self, version: i64) -> Result<Option<Snapshot<C>>> {
        let version = validate_version(version)?;
        if !self.records.contains_key(&version) {
            return Ok(None);
        }
        if self.active == Some(version) {
            return Err(Error::CannotRemoveActive(version));
        }

        let removed = self.records.remove(&version);
        tracing::debug!(version, size = self.records.len(), "config removed");
        Ok(removed)
    }

    /// Make `version` the active record.
    ///
    /// The previously active record, if any, becomes inactive in the same
    /// call. Activating the current active record is a no-op.
    pub fn activate(&mut self, version: i64) -> Result<Snapshot<C>> {
        let version = validate_version(version)?;
        let Some(target) = self.records.get(&version) else {
            return Err(Error::ConfigNotFound(version));
        };
        if self.active == Some(version) {
            return Ok(target.clone());
        }

        // Build both replacements before touching the store.
        let activated = target.rebuild(|c| c.set_status(ConfigStatus::Active));
        let deactivated = self.active.and_then(|previous| {
            self.records
                .get(&previous)
                .map(|s| (previous, s.rebuild(|c| c.set_status(ConfigStatus::Inactive))))
        });

        let previous = deactivated.as_ref().map(|(previous, _)| *previous);
        if let Some((previous, snapshot)) = deactivated {
            self.records.insert(previous, snapshot);
        }
        self.records.insert(version, activated.clone());
        self.active = Some(version);

        tracing::debug!(version, previous = ?previous, "config activated");
        Ok(activated)
    }

    /// Clear the active slot, returning the version that was active.
    pub fn deactivate(&mut self) -> Option<i64> {
        let previous = self.active.take()?;
        if let Some(stored) = self.records.get(&previous) {
            let snapshot = stored.rebuild(|c| c.set_status(ConfigStatus::Inactive));
            self.records.insert(previous, snapshot);
        }

        tracing::debug!(previous, "config deactivated");
        Some(previous)
    }

    /// The active record, if any.
    pub fn active(&self) -> Option<Snapshot<C>> {
        self.active
            .and_then(|version| self.records.get(&version))
            .cloned()
    }

    /// The record stored under `version`, if any.
    pub fn get(&self, version: i64) -> Result<Option<Snapshot<C>>> {
        let version = validate_version(version)?;
        Ok(self.records.get(&version).cloned())
    }

    /// Check whether `version` is stored.
    pub fn contains(&self, version: i64) -> Result<bool> {
        let version = validate_version(version)?;
        Ok(self.records.contains_key(&version))
    }

    /// All records. Currently yielded in ascending version order.
    pub fn get_all(&self) -> Vec<Snapshot<C>> {
        self.records.values().cloned().collect()
    }

    /// All stored versions in ascending order.
    pub fn versions(&self) -> Vec<i64> {
        self.records.keys().copied().collect()
    }
}

impl<C> ConfigManager<C> {
    /// Version of the active record, if any.
    pub fn active_version(&self) -> Option<i64> {
        self.active
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the manager holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
