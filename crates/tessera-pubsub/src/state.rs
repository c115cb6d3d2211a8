//! Session states.

/// Lifecycle state of a handler, ordered by how connected it is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SessionState {
    Unsubscribed = -1,
    #[default]
    Disconnected = 0,
    Connected = 1,
    Subscribed = 2,
}

impl SessionState {
    /// Numeric state code.
    pub fn code(self) -> i8 {
        self as i8
    }

    /// Check if this state is at least connected.
    pub fn is_connected(self) -> bool {
        self >= SessionState::Connected
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Unsubscribed => write!(f, "unsubscribed"),
            SessionState::Disconnected => write!(f, "disconnected"),
            SessionState::Connected => write!(f, "connected"),
            SessionState::Subscribed => write!(f, "subscribed"),
        }
    }
}
