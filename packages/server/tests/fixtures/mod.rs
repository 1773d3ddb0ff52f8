//! Test fixtures for integration tests.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use locshare_server::{
    infrastructure::{
        connection::{ConnectionManager, ConnectionSettings, ConnectionState, InMemoryConnector},
        link::ShareLinks,
        repository::{InMemorySessionRepository, ManagedSessionRepository},
        store::SessionStore,
    },
    ui::{build_router, middleware::RateLimiter, state::AppState},
};
use tokio::{net::TcpListener, task::JoinHandle};

pub const PUBLIC_BASE_URL: &str = "https://locshare.example";

/// Backing store of a test server
pub enum TestStore {
    /// In-memory store behind a running connection manager
    Available,
    /// Connection manager that never connects
    Unreachable,
}

pub struct TestServerOptions {
    pub store: TestStore,
    pub rate_limit_max: u32,
}

impl Default for TestServerOptions {
    fn default() -> Self {
        Self {
            store: TestStore::Available,
            rate_limit_max: 1_000,
        }
    }
}

/// Test server serving the real router in-process on an ephemeral port
pub struct TestServer {
    addr: SocketAddr,
    sessions: InMemorySessionRepository,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with an available in-memory store
    pub async fn start() -> Self {
        Self::start_with(TestServerOptions::default()).await
    }

    pub async fn start_with(options: TestServerOptions) -> Self {
        let sessions = InMemorySessionRepository::new();
        let state = match options.store {
            TestStore::Available => {
                let store = SessionStore::start(
                    InMemoryConnector::new(sessions.clone()),
                    ConnectionSettings::default(),
                    Duration::from_secs(5),
                );
                let mut connection = store.connection.subscribe();
                connection
                    .wait_for(|s| *s == ConnectionState::Connected)
                    .await
                    .expect("Connection manager stopped");
                AppState::new(
                    store.repository.clone(),
                    store.connection.clone(),
                    ShareLinks::new(PUBLIC_BASE_URL),
                )
            }
            TestStore::Unreachable => {
                let manager = Arc::new(ConnectionManager::new(
                    InMemoryConnector::new(sessions.clone()),
                    ConnectionSettings::default(),
                ));
                AppState::new(
                    Arc::new(ManagedSessionRepository::new(
                        manager.clone(),
                        Duration::from_secs(5),
                    )),
                    manager,
                    ShareLinks::new(PUBLIC_BASE_URL),
                )
            }
        };

        let limiter = Arc::new(RateLimiter::new(
            options.rate_limit_max,
            Duration::from_secs(15 * 60),
        ));
        let app = build_router(Arc::new(state), limiter);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");

        let handle = tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("Test server failed");
        });

        Self {
            addr,
            sessions,
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Direct access to the stored sessions
    pub fn sessions(&self) -> &InMemorySessionRepository {
        &self.sessions
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
