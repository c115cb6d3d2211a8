//! The pub-sub lifecycle state machine.

use std::sync::Arc;

use bytes::Bytes;
use parking_lot::RwLock;
use tokio::sync::{broadcast, Mutex, MutexGuard};

use crate::config::{BusyPolicy, HandlerConfig};
use crate::error::{Error, Result, TransportError};
use crate::event::{EventBus, EventKind, EventSink, LifecycleEvent, ListenerId};
use crate::mode::Mode;
use crate::state::SessionState;
use crate::transport::PubSubTransport;

/// Drives a [`PubSubTransport`] through the connect/subscribe/publish lifecycle.
///
/// Every transition takes the transition lock, re-checks its guards against
/// the current state, runs the transport hook, and only then records the new
/// state and emits the matching event. While a hook is in flight the state
/// still reads as it was before the transition started.
///
/// Overlapping transitions are queued or rejected according to
/// [`HandlerConfig::busy_policy`].
pub struct PubSubHandler<T> {
    mode: Mode,
    state: RwLock<SessionState>,
    transport: Mutex<T>,
    events: Arc<EventBus>,
    config: HandlerConfig,
}

impl<T: PubSubTransport> PubSubHandler<T> {
    /// Create a handler with default configuration.
    pub fn new(mode: Mode, transport: T) -> Self {
        Self::with_config(mode, transport, HandlerConfig::default())
    }

    /// Create a handler with the given configuration.
    pub fn with_config(mode: Mode, mut transport: T, config: HandlerConfig) -> Self {
        let events = Arc::new(EventBus::new(config.event_capacity));
        transport.attach(EventSink::new(Arc::clone(&events)));

        Self {
            mode,
            state: RwLock::new(SessionState::Disconnected),
            transport: Mutex::new(transport),
            events,
            config,
        }
    }

    /// Start building a handler from loosely typed parts.
    pub fn builder() -> HandlerBuilder<T> {
        HandlerBuilder::new()
    }

    /// Connect the transport. No-op if already connected.
    pub async fn connect(&self) -> Result<()> {
        let mut transport = self.begin("connect").await?;
        if self.is_connected() {
            return Ok(());
        }

        Self::run_hook("connect", transport.connect().await)?;
        self.finish(SessionState::Connected, LifecycleEvent::Connected);
        Ok(())
    }

    /// Disconnect the transport. No-op if not connected.
    pub async fn disconnect(&self) -> Result<()> {
        let mut transport = self.begin("disconnect").await?;
        if !self.is_connected() {
            return Ok(());
        }

        Self::run_hook("disconnect", transport.disconnect().await)?;
        self.finish(SessionState::Disconnected, LifecycleEvent::Disconnected);
        Ok(())
    }

    /// Subscribe to `channel`.
    pub async fn subscribe(&self, channel: &str) -> Result<()> {
        let mut transport = self.begin("subscribe").await?;
        self.check_subscribe()?;

        Self::run_hook("subscribe", transport.subscribe(channel).await)?;
        self.finish(
            SessionState::Subscribed,
            LifecycleEvent::Subscribed {
                channel: channel.to_string(),
            },
        );
        Ok(())
    }

    /// Unsubscribe from `channel`.
    ///
    /// The session state drops to disconnected afterwards; call
    /// [`connect`](Self::connect) again before the next subscribe or publish.
    pub async fn unsubscribe(&self, channel: &str) -> Result<()> {
        let mut transport = self.begin("unsubscribe").await?;
        self.check_subscribe()?;

        Self::run_hook("unsubscribe", transport.unsubscribe(channel).await)?;
        self.finish(
            SessionState::Disconnected,
            LifecycleEvent::Unsubscribed {
                channel: channel.to_string(),
            },
        );
        Ok(())
    }

    /// Publish `message` on `channel`. The state is left unchanged.
    pub async fn publish(&self, channel: &str, message: impl Into<Bytes>) -> Result<()> {
        let message = message.into();
        let mut transport = self.begin("publish").await?;
        if !self.is_connected() {
            return Err(Error::NotConnected);
        }
        if !self.can_publish() {
            return Err(Error::CannotPublish(self.mode));
        }

        Self::run_hook("publish", transport.publish(channel, message.clone()).await)?;
        self.events.emit(LifecycleEvent::Published {
            channel: channel.to_string(),
            message,
        });
        Ok(())
    }

    /// Lock the transport, consuming the handler's busy policy.
    async fn begin(&self, operation: &'static str) -> Result<MutexGuard<'_, T>> {
        match self.config.busy_policy {
            BusyPolicy::Queue => Ok(self.transport.lock().await),
            BusyPolicy::Reject => self.transport.try_lock().map_err(|_| {
                tracing::warn!(operation, mode = %self.mode, "transition rejected while busy");
                Error::Busy
            }),
        }
    }

    fn check_subscribe(&self) -> Result<()> {
        if !self.is_connected() {
            return Err(Error::NotConnected);
        }
        if !self.can_subscribe() {
            return Err(Error::CannotSubscribe(self.mode));
        }
        Ok(())
    }

    fn run_hook(
        operation: &'static str,
        result: std::result::Result<(), TransportError>,
    ) -> Result<()> {
        result.map_err(|e| {
            tracing::warn!(operation, error = %e, "transport hook failed");
            Error::Transport(e)
        })
    }

    fn finish(&self, next: SessionState, event: LifecycleEvent) {
        let previous = std::mem::replace(&mut *self.state.write(), next);
        tracing::debug!(mode = %self.mode, from = %previous, to = %next, "state changed");
        self.events.emit(event);
    }
}

impl<T> PubSubHandler<T> {
    /// The handler's fixed mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The current session state.
    pub fn state(&self) -> SessionState {
        *self.state.read()
    }

    /// Check if the session is at least connected.
    pub fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    /// Check if the session is subscribed.
    pub fn is_subscribed(&self) -> bool {
        self.state() == SessionState::Subscribed
    }

    /// Check if the mode permits subscribing.
    pub fn can_subscribe(&self) -> bool {
        self.mode.can_subscribe()
    }

    /// Check if the mode permits publishing.
    pub fn can_publish(&self) -> bool {
        self.mode.can_publish()
    }

    /// The handler configuration.
    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// Register a listener for every event of `kind`.
    pub fn on<F>(&self, kind: EventKind, callback: F) -> ListenerId
    where
        F: Fn(&LifecycleEvent) + Send + Sync + 'static,
    {
        self.events.on(kind, callback)
    }

    /// Register a listener for the next event of `kind`.
    pub fn once<F>(&self, kind: EventKind, callback: F) -> ListenerId
    where
        F: Fn(&LifecycleEvent) + Send + Sync + 'static,
    {
        self.events.once(kind, callback)
    }

    /// Remove a listener.
    pub fn off(&self, id: ListenerId) -> bool {
        self.events.off(id)
    }

    /// Number of listeners registered for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.events.listener_count(kind)
    }

    /// Open a receiver for events emitted from now on.
    pub fn events(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.events.subscribe()
    }

    /// Access the transport, waiting for any in-flight transition.
    pub async fn transport(&self) -> MutexGuard<'_, T> {
        self.transport.lock().await
    }

    /// Consume the handler and return its transport.
    pub fn into_transport(self) -> T {
        self.transport.into_inner()
    }
}

impl<T> std::fmt::Debug for PubSubHandler<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PubSubHandler")
            .field("mode", &self.mode)
            .field("state", &self.state())
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for handlers whose mode arrives as a raw code.
pub struct HandlerBuilder<T> {
    mode: Option<u8>,
    transport: Option<T>,
    config: HandlerConfig,
}

impl<T: PubSubTransport> HandlerBuilder<T> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            mode: None,
            transport: None,
            config: HandlerConfig::default(),
        }
    }

    /// Set the mode.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode.code());
        self
    }

    /// Set the mode from its numeric code. Checked in [`build`](Self::build).
    pub fn mode_code(mut self, code: u8) -> Self {
        self.mode = Some(code);
        self
    }

    /// Set the transport the handler will drive.
    pub fn transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set the handler configuration.
    pub fn config(mut self, config: HandlerConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the handler.
    ///
    /// Fails with [`Error::AbstractInstantiation`] when no transport was
    /// given, and with [`Error::InvalidMode`] when the mode is missing or
    /// unrecognized.
    pub fn build(self) -> Result<PubSubHandler<T>> {
        let transport = self.transport.ok_or(Error::AbstractInstantiation)?;
        let code = self
            .mode
            .ok_or_else(|| Error::InvalidMode("no mode given".to_string()))?;
        let mode = Mode::try_from(code)?;

        Ok(PubSubHandler::with_config(mode, transport, self.config))
    }
}

impl<T: PubSubTransport> Default for HandlerBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
