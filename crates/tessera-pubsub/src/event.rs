//! Lifecycle events and listener dispatch.
//!
//! Events are dispatched synchronously, in registration order, to listeners
//! registered for the event's kind, then sent on a broadcast channel for any
//! live receivers. Nothing is buffered for listeners registered later.

use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::error::Error;

/// Names of lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Connected,
    Disconnected,
    Subscribed,
    Unsubscribed,
    Published,
    Message,
}

impl EventKind {
    /// The event name.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Connected => "connected",
            EventKind::Disconnected => "disconnected",
            EventKind::Subscribed => "subscribed",
            EventKind::Unsubscribed => "unsubscribed",
            EventKind::Published => "published",
            EventKind::Message => "message",
        }
    }
}

impl FromStr for EventKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "connected" => Ok(EventKind::Connected),
            "disconnected" => Ok(EventKind::Disconnected),
            "subscribed" => Ok(EventKind::Subscribed),
            "unsubscribed" => Ok(EventKind::Unsubscribed),
            "published" => Ok(EventKind::Published),
            "message" => Ok(EventKind::Message),
            other => Err(Error::UnknownEvent(other.to_string())),
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event emitted after a lifecycle transition, or by a transport on inbound traffic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    Connected,
    Disconnected,
    Subscribed { channel: String },
    Unsubscribed { channel: String },
    Published { channel: String, message: Bytes },
    Message { channel: String, message: Bytes },
}

impl LifecycleEvent {
    /// The kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            LifecycleEvent::Connected => EventKind::Connected,
            LifecycleEvent::Disconnected => EventKind::Disconnected,
            LifecycleEvent::Subscribed { .. } => EventKind::Subscribed,
            LifecycleEvent::Unsubscribed { .. } => EventKind::Unsubscribed,
            LifecycleEvent::Published { .. } => EventKind::Published,
            LifecycleEvent::Message { .. } => EventKind::Message,
        }
    }

    /// The channel the event concerns, if any.
    pub fn channel(&self) -> Option<&str> {
        match self {
            LifecycleEvent::Connected | LifecycleEvent::Disconnected => None,
            LifecycleEvent::Subscribed { channel }
            | LifecycleEvent::Unsubscribed { channel }
            | LifecycleEvent::Published { channel, .. }
            | LifecycleEvent::Message { channel, .. } => Some(channel),
        }
    }
}

/// Handle returned when registering a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Arc<dyn Fn(&LifecycleEvent) + Send + Sync>;

struct Listener {
    id: ListenerId,
    kind: EventKind,
    once: bool,
    callback: Callback,
}

/// Registry of lifecycle listeners plus a broadcast channel.
pub struct EventBus {
    listeners: Mutex<Vec<Listener>>,
    next_listener_id: AtomicU64,
    sender: broadcast::Sender<LifecycleEvent>,
}

impl EventBus {
    /// Create a bus whose broadcast channel holds up to `capacity` events per receiver.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            listeners: Mutex::new(Vec::new()),
            next_listener_id: AtomicU64::new(1),
            sender,
        }
    }

    /// Register a listener for every event of `kind`.
    pub fn on<F>(&self, kind: EventKind, callback: F) -> ListenerId
    where
        F: Fn(&LifecycleEvent) + Send + Sync + 'static,
    {
        self.register(kind, false, Arc::new(callback))
    }

    /// Register a listener for the next event of `kind` only.
    pub fn once<F>(&self, kind: EventKind, callback: F) -> ListenerId
    where
        F: Fn(&LifecycleEvent) + Send + Sync + 'static,
    {
        self.register(kind, true, Arc::new(callback))
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|listener| listener.id != id);
        listeners.len() != before
    }

    /// Number of listeners registered for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners
            .lock()
            .iter()
            .filter(|listener| listener.kind == kind)
            .count()
    }

    /// Open a receiver for events emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.sender.subscribe()
    }

    /// Dispatch an event to listeners and broadcast receivers.
    pub fn emit(&self, event: LifecycleEvent) {
        let kind = event.kind();

        // Callbacks run outside the lock so they may register or remove listeners.
        let callbacks: Vec<Callback> = {
            let mut listeners = self.listeners.lock();
            let matched = listeners
                .iter()
                .filter(|listener| listener.kind == kind)
                .map(|listener| Arc::clone(&listener.callback))
                .collect();
            listeners.retain(|listener| !(listener.once && listener.kind == kind));
            matched
        };

        for callback in &callbacks {
            callback(&event);
        }

        // No receivers is not an error.
        let receivers = self.sender.send(event).unwrap_or(0);

        tracing::trace!(
            event = %kind,
            listeners = callbacks.len(),
            receivers,
            "lifecycle event emitted"
        );
    }

    fn register(&self, kind: EventKind, once: bool, callback: Callback) -> ListenerId {
        let id = ListenerId(self.next_listener_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push(Listener {
            id,
            kind,
            once,
            callback,
        });
        id
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.lock().len())
            .field("receivers", &self.sender.receiver_count())
            .finish()
    }
}

/// Cloneable handle a transport uses to surface inbound messages.
#[derive(Clone, Debug)]
pub struct EventSink {
    bus: Arc<EventBus>,
}

impl EventSink {
    pub(crate) fn new(bus: Arc<EventBus>) -> Self {
        Self { bus }
    }

    /// Emit a `message` event for data received on `channel`.
    pub fn message(&self, channel: impl Into<String>, message: impl Into<Bytes>) {
        self.bus.emit(LifecycleEvent::Message {
            channel: channel.into(),
            message: message.into(),
        });
    }
}
