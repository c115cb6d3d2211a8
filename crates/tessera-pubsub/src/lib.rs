//! Tessera PubSub - Capability-gated publish/subscribe client lifecycle.
//!
//! A [`PubSubHandler`] owns a [`PubSubTransport`] and moves it through the
//! connect/subscribe/publish lifecycle, refusing operations its [`Mode`]
//! does not allow and emitting a [`LifecycleEvent`] after every completed
//! transition.
//!
//! # Quick Start
//!
//! ```ignore
//! use tessera_pubsub::{MemoryBroker, Mode, PubSubHandler};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tessera_pubsub::Error> {
//!     let broker = MemoryBroker::new();
//!     let handler = PubSubHandler::new(Mode::Dual, broker.transport());
//!
//!     handler.connect().await?;
//!     handler.subscribe("alerts").await?;
//!     handler.publish("alerts", "disk almost full").await?;
//!     handler.disconnect().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod memory;
pub mod mode;
pub mod state;
pub mod transport;

pub use config::{BusyPolicy, HandlerConfig};
pub use error::{Error, Result, TransportError};
pub use event::{EventBus, EventKind, EventSink, LifecycleEvent, ListenerId};
pub use handler::{HandlerBuilder, PubSubHandler};
pub use memory::{MemoryBroker, MemoryTransport};
pub use mode::Mode;
pub use state::SessionState;
pub use transport::PubSubTransport;

/// Re-export for transport implementors.
pub use async_trait::async_trait;
pub use bytes::Bytes;
