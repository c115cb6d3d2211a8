//! Transport hooks driven by the handler.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::TransportError;
use crate::event::EventSink;

/// The I/O side of a pub-sub client.
///
/// A [`PubSubHandler`](crate::PubSubHandler) owns one transport and calls
/// these hooks when a transition has passed its guards. The handler only
/// advances its state after a hook returns `Ok`, and never calls two hooks
/// at the same time.
#[async_trait]
pub trait PubSubTransport: Send + 'static {
    /// Receive the sink for inbound `message` events.
    ///
    /// Called once, when the handler takes ownership of the transport.
    fn attach(&mut self, sink: EventSink) {
        let _ = sink;
    }

    /// Open the connection.
    async fn connect(&mut self) -> Result<(), TransportError>;

    /// Close the connection.
    async fn disconnect(&mut self) -> Result<(), TransportError>;

    /// Start receiving messages on `channel`.
    async fn subscribe(&mut self, channel: &str) -> Result<(), TransportError>;

    /// Stop receiving messages on `channel`.
    ///
    /// The handler treats the session as disconnected afterwards, so an
    /// implementation should release every channel and close the connection.
    async fn unsubscribe(&mut self, channel: &str) -> Result<(), TransportError>;

    /// Send `message` on `channel`.
    async fn publish(&mut self, channel: &str, message: Bytes) -> Result<(), TransportError>;
}
