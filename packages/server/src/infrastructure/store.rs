//! Wiring of a connector, its connection manager and the managed repository.

use std::{sync::Arc, time::Duration};

use tokio::task::JoinHandle;

use crate::{
    domain::SessionRepository,
    infrastructure::{
        connection::{ConnectionControl, ConnectionManager, ConnectionSettings, Connector},
        repository::ManagedSessionRepository,
    },
};

/// A running session store: repository for handlers, control for lifecycle.
pub struct SessionStore {
    pub repository: Arc<dyn SessionRepository>,
    pub connection: Arc<dyn ConnectionControl>,
    task: JoinHandle<()>,
}

impl SessionStore {
    /// Spawn the connection loop for `connector` and wrap it in a repository.
    pub fn start<C>(connector: C, settings: ConnectionSettings, operation_timeout: Duration) -> Self
    where
        C: Connector,
        C::Handle: SessionRepository,
    {
        let (manager, task) = ConnectionManager::spawn(connector, settings);
        let repository = Arc::new(ManagedSessionRepository::new(
            Arc::clone(&manager),
            operation_timeout,
        ));
        Self {
            repository,
            connection: manager,
            task,
        }
    }

    /// Stop the connection loop and wait for it to release the connection.
    pub async fn shutdown(self) {
        self.connection.shutdown();
        if let Err(e) = self.task.await {
            tracing::warn!("Session store task ended abnormally: {}", e);
        }
    }
}
