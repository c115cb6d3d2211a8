//! Tessera - Invariant-enforcing in-memory state.
//!
//! Three independent building blocks:
//!
//! - [`Catalog`]: entities kept sorted by identity, handed out as snapshots.
//! - [`ConfigManager`]: versioned config records with one active slot.
//! - [`PubSubHandler`]: capability-gated pub-sub client lifecycle
//!   (requires the `async` feature, enabled by default).
//!
//! # Example
//!
//! ```
//! use tessera::{Catalog, Entity};
//!
//! #[derive(Clone)]
//! struct Venue {
//!     id: i64,
//!     name: String,
//! }
//!
//! impl Entity for Venue {
//!     fn id(&self) -> i64 {
//!         self.id
//!     }
//! }
//!
//! let mut catalog = Catalog::new();
//! catalog.insert(&Venue { id: 2, name: "Neumos".into() }).unwrap();
//! catalog.insert(&Venue { id: 1, name: "Showbox".into() }).unwrap();
//!
//! let names: Vec<String> = catalog.iter().map(|v| v.name.clone()).collect();
//! assert_eq!(names, ["Showbox", "Neumos"]);
//! ```

pub use tessera_core::{
    catalog, config, find_index, insertion_index, snapshot, validate_identity, validate_version,
    Catalog, ConfigManager, ConfigStatus, Entity, Error, Result, Snapshot, Versioned,
};

/// Pub-sub lifecycle types.
#[cfg(feature = "async")]
pub use tessera_pubsub as pubsub;

#[cfg(feature = "async")]
pub use tessera_pubsub::{
    BusyPolicy, HandlerBuilder, HandlerConfig, LifecycleEvent, MemoryBroker, Mode, PubSubHandler,
    PubSubTransport, SessionState,
};
