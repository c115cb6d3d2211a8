//! Config record contract and status codes.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Activation status of a config record.
///
/// Serialized as its numeric code: `0` for inactive, `1` for active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum ConfigStatus {
    /// Stored but not in effect.
    #[default]
    Inactive = 0,
    /// The single record currently in effect.
    Active = 1,
}

impl ConfigStatus {
    /// Check if this is the active status.
    pub fn is_active(self) -> bool {
        self == ConfigStatus::Active
    }

    /// Numeric status code.
    pub fn code(self) -> i64 {
        self as i64
    }
}

impl TryFrom<i64> for ConfigStatus {
    type Error = Error;

    fn try_from(code: i64) -> Result<Self> {
        match code {
            0 => Ok(ConfigStatus::Inactive),
            1 => Ok(ConfigStatus::Active),
            other => Err(Error::InvalidStatus(other)),
        }
    }
}

impl TryFrom<u8> for ConfigStatus {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        ConfigStatus::try_from(i64::from(code))
    }
}

impl From<ConfigStatus> for i64 {
    fn from(status: ConfigStatus) -> Self {
        status.code()
    }
}

impl std::fmt::Display for ConfigStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigStatus::Inactive => write!(f, "inactive"),
            ConfigStatus::Active => write!(f, "active"),
        }
    }
}

/// A config record keyed by version.
///
/// Implementors must report back whatever status was last set through
/// [`Versioned::set_status`]. Stored records are copied with `Clone`, so
/// state shared across clones is shared with the stored snapshot too.
pub trait Versioned {
    /// Record version. Valid versions are `>= 0`.
    fn version(&self) -> i64;

    /// Current activation status.
    fn status(&self) -> ConfigStatus;

    /// Overwrite the activation status.
    fn set_status(&mut self, status: ConfigStatus);
}

/// Check that `version` is a usable config version.
pub fn validate_version(version: i64) -> Result<i64> {
    if version >= 0 {
        Ok(version)
    } else {
        Err(Error::InvalidVersion(version))
    }
}
