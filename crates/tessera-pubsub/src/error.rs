//! Pub-sub handler error types.

use thiserror::Error;

use crate::mode::Mode;

/// Errors raised by the pub-sub lifecycle.
#[derive(Debug, Error)]
pub enum Error {
    /// Mode value is not one of sub, pub, or dual.
    #[error("invalid mode: {0}")]
    InvalidMode(String),

    /// A handler was built without a transport to drive.
    #[error("cannot build a handler without a transport")]
    AbstractInstantiation,

    /// The operation requires a connected session.
    #[error("not connected")]
    NotConnected,

    /// The handler's mode does not allow subscribing.
    #[error("mode '{0}' cannot subscribe")]
    CannotSubscribe(Mode),

    /// The handler's mode does not allow publishing.
    #[error("mode '{0}' cannot publish")]
    CannotPublish(Mode),

    /// Another transition is in flight and the handler rejects concurrent calls.
    #[error("another transition is in progress")]
    Busy,

    /// Event name is not a known lifecycle event.
    #[error("unknown event: {0}")]
    UnknownEvent(String),

    /// The transport hook failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Error reported by a transport hook.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    /// Create a transport error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create a transport error wrapping an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result alias for pub-sub operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_transport_error_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = TransportError::with_source("dial failed", io);

        assert_eq!(err.to_string(), "dial failed");
        assert_eq!(err.source().unwrap().to_string(), "refused");

        let wrapped = Error::from(err);
        assert_eq!(wrapped.to_string(), "transport error: dial failed");
    }

    #[test]
    fn test_guard_messages() {
        assert_eq!(
            Error::CannotPublish(Mode::Sub).to_string(),
            "mode 'sub' cannot publish"
        );
        assert_eq!(Error::NotConnected.to_string(), "not connected");
    }
}
