//! Handler configuration.

use serde::{Deserialize, Serialize};

/// Default number of events buffered per broadcast receiver.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// What a handler does when a transition arrives while another is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusyPolicy {
    /// Wait for the in-flight transition, then run in arrival order.
    #[default]
    Queue,
    /// Fail immediately with a busy error.
    Reject,
}

/// Pub-sub handler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    /// Handling of overlapping transitions.
    pub busy_policy: BusyPolicy,

    /// Events buffered per broadcast receiver before old ones are dropped.
    pub event_capacity: usize,
}

impl HandlerConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self {
            busy_policy: BusyPolicy::default(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    /// Set the busy policy.
    pub fn with_busy_policy(mut self, policy: BusyPolicy) -> Self {
        self.busy_policy = policy;
        self
    }

    /// Set the broadcast capacity.
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self::new()
    }
}
