//! Handler capability modes.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Which operations a handler may perform. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Subscribe only.
    Sub = 1,
    /// Publish only.
    Pub = 2,
    /// Subscribe and publish.
    Dual = 3,
}

impl Mode {
    /// Numeric mode code.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Check if this mode permits subscribe and unsubscribe.
    pub fn can_subscribe(self) -> bool {
        matches!(self, Mode::Sub | Mode::Dual)
    }

    /// Check if this mode permits publish.
    pub fn can_publish(self) -> bool {
        matches!(self, Mode::Pub | Mode::Dual)
    }
}

impl TryFrom<u8> for Mode {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Error> {
        match code {
            1 => Ok(Mode::Sub),
            2 => Ok(Mode::Pub),
            3 => Ok(Mode::Dual),
            other => Err(Error::InvalidMode(other.to_string())),
        }
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_lowercase().as_str() {
            "sub" => Ok(Mode::Sub),
            "pub" => Ok(Mode::Pub),
            "dual" => Ok(Mode::Dual),
            _ => Err(Error::InvalidMode(s.to_string())),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Sub => write!(f, "sub"),
            Mode::Pub => write!(f, "pub"),
            Mode::Dual => write!(f, "dual"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities() {
        assert!(Mode::Sub.can_subscribe());
        assert!(!Mode::Sub.can_publish());
        assert!(!Mode::Pub.can_subscribe());
        assert!(Mode::Pub.can_publish());
        assert!(Mode::Dual.can_subscribe());
        assert!(Mode::Dual.can_publish());
    }

    #[test]
    fn test_mode_codes() {
        for mode in [Mode::Sub, Mode::Pub, Mode::Dual] {
            assert_eq!(Mode::try_from(mode.code()).unwrap(), mode);
        }
        assert!(matches!(Mode::try_from(0), Err(Error::InvalidMode(_))));
        assert!(matches!(Mode::try_from(4), Err(Error::InvalidMode(_))));
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("DUAL".parse::<Mode>().unwrap(), Mode::Dual);
        assert_eq!("sub".parse::<Mode>().unwrap(), Mode::Sub);
        assert!(matches!(
            "broadcast".parse::<Mode>(),
            Err(Error::InvalidMode(name)) if name == "broadcast"
        ));
    }

    #[test]
    fn test_mode_serde() {
        assert_eq!(serde_json::to_string(&Mode::Pub).unwrap(), "\"pub\"");
        let mode: Mode = serde_json::from_str("\"dual\"").unwrap();
        assert_eq!(mode, Mode::Dual);
    }
}
