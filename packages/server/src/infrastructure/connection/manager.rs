//! Connection state machine for the session store.
//!
//! ```text
//! DISCONNECTED ──► CONNECTING ──► CONNECTED
//!       ▲               │              │
//!       └── backoff ◄───┴──── error ◄──┘
//! ```
//!
//! The loop never gives up: every failure is logged, followed by a fixed
//! backoff and a new attempt. Callers that ask for a handle while the state
//! is not `Connected` get an error immediately instead of waiting.

use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{RwLock, watch};

/// Default bound for a single connection attempt
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default wait between two connection attempts
pub const DEFAULT_RECONNECT_BACKOFF: Duration = Duration::from_secs(5);

/// Default interval between two health checks of a live connection
pub const DEFAULT_HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(10);

/// Connection lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        };
        f.write_str(s)
    }
}

/// Errors raised while establishing or supervising a store connection
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// The connection settings themselves are unusable
    #[error("invalid store configuration: {0}")]
    Config(String),

    /// A connection attempt did not finish in time
    #[error("connection attempt timed out after {0:?}")]
    Timeout(Duration),

    /// A connection attempt failed
    #[error("failed to connect to session store: {0}")]
    Connect(String),

    /// A live connection stopped answering health checks
    #[error("session store health check failed: {0}")]
    HealthCheck(String),

    /// A store operation reported a transport failure
    #[error("session store connection lost")]
    Lost,

    /// A handle was requested while the store is not connected
    #[error("session store is {0}")]
    NotConnected(ConnectionState),
}

/// Backend-specific way of opening and probing a store connection
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// Whatever request handlers need to talk to the store
    type Handle: Clone + Send + Sync + 'static;

    /// Open a new connection
    async fn connect(&self) -> Result<Self::Handle, ConnectionError>;

    /// Check that an open connection is still usable
    async fn ping(&self, handle: &Self::Handle) -> Result<(), ConnectionError>;

    /// Release a connection that is no longer used
    async fn close(&self, _handle: Self::Handle) {}
}

/// Timing parameters of the connection loop
#[derive(Debug, Clone, Copy)]
pub struct ConnectionSettings {
    pub connect_timeout: Duration,
    pub reconnect_backoff: Duration,
    pub health_check_interval: Duration,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            reconnect_backoff: DEFAULT_RECONNECT_BACKOFF,
            health_check_interval: DEFAULT_HEALTH_CHECK_INTERVAL,
        }
    }
}

/// Backend-independent view of a connection manager
pub trait ConnectionControl: Send + Sync {
    /// Current state
    fn state(&self) -> ConnectionState;

    /// Receiver notified on every state transition
    fn subscribe(&self) -> watch::Receiver<ConnectionState>;

    /// Stop the connection loop
    fn shutdown(&self);
}

/// Why supervision of a live connection ended
enum Supervision {
    Lost(ConnectionError),
    Shutdown,
}

/// Owns the single store connection and keeps it alive.
pub struct ConnectionManager<C: Connector> {
    connector: C,
    settings: ConnectionSettings,
    handle: RwLock<Option<C::Handle>>,
    state: watch::Sender<ConnectionState>,
    /// Number of reported transport failures; supervision watches for changes
    failures: watch::Sender<u64>,
    shutdown: watch::Sender<bool>,
}

impl<C: Connector> ConnectionManager<C> {
    /// Create a manager in the `Disconnected` state. Nothing happens until [`Self::run`].
    pub fn new(connector: C, settings: ConnectionSettings) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        let (shutdown, _) = watch::channel(false);
        let (failures, _) = watch::channel(0);
        Self {
            connector,
            settings,
            handle: RwLock::new(None),
            state,
            failures,
            shutdown,
        }
    }

    /// Create the manager and spawn its connection loop on the current runtime.
    pub fn spawn(
        connector: C,
        settings: ConnectionSettings,
    ) -> (Arc<Self>, tokio::task::JoinHandle<()>) {
        let manager = Arc::new(Self::new(connector, settings));
        let task = tokio::spawn(Arc::clone(&manager).run());
        (manager, task)
    }

    /// The live handle, or an error if the store is not connected.
    pub async fn current(&self) -> Result<C::Handle, ConnectionError> {
        let state = *self.state.borrow();
        if state != ConnectionState::Connected {
            return Err(ConnectionError::NotConnected(state));
        }
        self.handle
            .read()
            .await
            .clone()
            .ok_or(ConnectionError::NotConnected(ConnectionState::Disconnected))
    }

    /// Signal that an operation on the current handle hit a transport error.
    ///
    /// Drops the connection and starts reconnecting. No-op unless connected.
    pub fn report_failure(&self) {
        if *self.state.borrow() == ConnectionState::Connected {
            self.failures.send_modify(|n| *n += 1);
        }
    }

    /// Run the connection loop until [`ConnectionControl::shutdown`] is called.
    pub async fn run(self: Arc<Self>) {
        let mut shutdown = self.shutdown.subscribe();
        let mut failures = self.failures.subscribe();

        loop {
            if *shutdown.borrow() {
                break;
            }

            self.set_state(ConnectionState::Connecting);
            tracing::info!("Connecting to session store");

            let attempt = tokio::select! {
                result = tokio::time::timeout(self.settings.connect_timeout, self.connector.connect()) => result,
                _ = stopped(&mut shutdown) => break,
            };

            match attempt {
                Ok(Ok(handle)) => {
                    *self.handle.write().await = Some(handle.clone());
                    // Reports about earlier connections do not concern this one
                    failures.borrow_and_update();
                    self.set_state(ConnectionState::Connected);
                    tracing::info!("Connected to session store");

                    let outcome = self.supervise(&handle, &mut shutdown, &mut failures).await;
                    self.release(handle).await;

                    match outcome {
                        Supervision::Shutdown => break,
                        Supervision::Lost(err) => {
                            tracing::error!(error = %err, "Session store disconnected");
                        }
                    }
                }
                Ok(Err(err)) => {
                    self.set_state(ConnectionState::Disconnected);
                    tracing::error!(error = %err, "Session store connection error");
                }
                Err(_) => {
                    self.set_state(ConnectionState::Disconnected);
                    let err = ConnectionError::Timeout(self.settings.connect_timeout);
                    tracing::error!(error = %err, "Session store connection error");
                }
            }

            tracing::warn!(
                backoff_secs = self.settings.reconnect_backoff.as_secs_f64(),
                "Retrying session store connection"
            );
            tokio::select! {
                _ = tokio::time::sleep(self.settings.reconnect_backoff) => {}
                _ = stopped(&mut shutdown) => break,
            }
        }

        self.set_state(ConnectionState::Disconnected);
        tracing::info!("Session store connection loop stopped");
    }

    /// Watch a live connection until it fails or shutdown is requested.
    ///
    /// Failure reports also end a ping in flight. The receiver keeps the
    /// last seen version, so a report between two selects is not lost.
    async fn supervise(
        &self,
        handle: &C::Handle,
        shutdown: &mut watch::Receiver<bool>,
        failures: &mut watch::Receiver<u64>,
    ) -> Supervision {
        let mut health_check = tokio::time::interval(self.settings.health_check_interval);
        health_check.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately; the connection was just verified
        health_check.tick().await;

        loop {
            tokio::select! {
                _ = stopped(shutdown) => return Supervision::Shutdown,
                _ = failures.changed() => return Supervision::Lost(ConnectionError::Lost),
                _ = health_check.tick() => {}
            }

            tokio::select! {
                _ = stopped(shutdown) => return Supervision::Shutdown,
                _ = failures.changed() => return Supervision::Lost(ConnectionError::Lost),
                result = self.connector.ping(handle) => {
                    if let Err(err) = result {
                        return Supervision::Lost(err);
                    }
                }
            }
        }
    }

    /// Leave the `Connected` state and hand the connection back to the connector.
    async fn release(&self, handle: C::Handle) {
        self.set_state(ConnectionState::Disconnected);
        self.handle.write().await.take();
        self.connector.close(handle).await;
    }

    fn set_state(&self, state: ConnectionState) {
        let previous = self.state.send_replace(state);
        if previous != state {
            tracing::debug!(from = %previous, to = %state, "Session store state changed");
        }
    }
}

/// Resolves once shutdown has been requested.
async fn stopped(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}

impl<C: Connector> ConnectionControl for ConnectionManager<C> {
    fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }
}
