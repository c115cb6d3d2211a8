//! In-process loopback transport.
//!
//! A [`MemoryBroker`] routes published messages to every [`MemoryTransport`]
//! subscribed to the channel, delivering them as `message` events on the
//! subscriber's handler. Useful for tests and demos; nothing leaves the
//! process.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use crate::error::TransportError;
use crate::event::EventSink;
use crate::transport::PubSubTransport;

#[derive(Default)]
struct BrokerState {
    /// Subscribers per channel, keyed by client ID.
    channels: HashMap<String, HashMap<u64, EventSink>>,
    /// Next client ID.
    next_client_id: u64,
    /// Messages accepted for delivery.
    published: u64,
}

/// Shared routing table for loopback transports.
#[derive(Clone, Default)]
pub struct MemoryBroker {
    state: Arc<Mutex<BrokerState>>,
}

impl MemoryBroker {
    /// Create an empty broker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport attached to this broker.
    pub fn transport(&self) -> MemoryTransport {
        let client_id = {
            let mut state = self.state.lock();
            state.next_client_id += 1;
            state.next_client_id
        };

        MemoryTransport {
            broker: self.clone(),
            client_id,
            sink: None,
            connected: false,
            channels: BTreeSet::new(),
        }
    }

    /// Number of transports subscribed to `channel`.
    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.state
            .lock()
            .channels
            .get(channel)
            .map_or(0, HashMap::len)
    }

    /// Channels with at least one subscriber, sorted.
    pub fn channels(&self) -> Vec<String> {
        let mut channels: Vec<String> = self.state.lock().channels.keys().cloned().collect();
        channels.sort();
        channels
    }

    /// Total messages accepted for delivery.
    pub fn published_count(&self) -> u64 {
        self.state.lock().published
    }

    fn join(&self, client_id: u64, channel: &str, sink: EventSink) {
        self.state
            .lock()
            .channels
            .entry(channel.to_string())
            .or_default()
            .insert(client_id, sink);
    }

    fn leave(&self, client_id: u64, channel: &str) {
        let mut state = self.state.lock();
        if let Some(subscribers) = state.channels.get_mut(channel) {
            subscribers.remove(&client_id);
            if subscribers.is_empty() {
                state.channels.remove(channel);
            }
        }
    }

    fn deliver(&self, channel: &str, message: Bytes) -> usize {
        let sinks: Vec<EventSink> = {
            let mut state = self.state.lock();
            state.published += 1;
            match state.channels.get(channel) {
                Some(subscribers) => subscribers.values().cloned().collect(),
                None => return 0,
            }
        };

        // Emit outside the broker lock so listeners may publish in turn.
        for sink in &sinks {
            sink.message(channel, message.clone());
        }

        tracing::trace!(channel, subscribers = sinks.len(), "delivered loopback message");
        sinks.len()
    }
}

impl std::fmt::Debug for MemoryBroker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MemoryBroker")
            .field("channels", &state.channels.len())
            .field("published", &state.published)
            .finish()
    }
}

/// A transport that routes through a [`MemoryBroker`].
#[derive(Debug)]
pub struct MemoryTransport {
    broker: MemoryBroker,
    client_id: u64,
    sink: Option<EventSink>,
    connected: bool,
    channels: BTreeSet<String>,
}

impl MemoryTransport {
    /// Broker-assigned client ID.
    pub fn client_id(&self) -> u64 {
        self.client_id
    }

    /// Check if the transport's connection is open.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Channels this transport is subscribed to, sorted.
    pub fn channels(&self) -> Vec<String> {
        self.channels.iter().cloned().collect()
    }

    /// Leave every joined channel and close the connection.
    fn close(&mut self) {
        for channel in std::mem::take(&mut self.channels) {
            self.broker.leave(self.client_id, &channel);
        }
        self.connected = false;
        tracing::debug!(client_id = self.client_id, "loopback disconnected");
    }

    fn ensure_connected(&self) -> Result<(), TransportError> {
        if self.connected {
            Ok(())
        } else {
            Err(TransportError::new("loopback connection is closed"))
        }
    }
}

#[async_trait]
impl PubSubTransport for MemoryTransport {
    fn attach(&mut self, sink: EventSink) {
        self.sink = Some(sink);
    }

    async fn connect(&mut self) -> Result<(), TransportError> {
        self.connected = true;
        tracing::debug!(client_id = self.client_id, "loopback connected");
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), TransportError> {
        self.close();
        Ok(())
    }

    async fn subscribe(&mut self, channel: &str) -> Result<(), TransportError> {
        self.ensure_connected()?;
        let sink = self
            .sink
            .clone()
            .ok_or_else(|| TransportError::new("transport is not attached to a handler"))?;

        self.broker.join(self.client_id, channel, sink);
        self.channels.insert(channel.to_string());
        Ok(())
    }

    async fn unsubscribe(&mut self, channel: &str) -> Result<(), TransportError> {
        tracing::debug!(client_id = self.client_id, channel, "loopback unsubscribing");
        self.close();
        Ok(())
    }

    async fn publish(&mut self, channel: &str, message: Bytes) -> Result<(), TransportError> {
        self.ensure_connected()?;
        self.broker.deliver(channel, message);
        Ok(())
    }
}
