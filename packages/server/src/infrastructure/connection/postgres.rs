//! Connector for the PostgreSQL session store.

use std::{str::FromStr, time::Duration};

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};

use super::manager::{ConnectionError, Connector};
use crate::infrastructure::repository::PgSessionRepository;

/// Default size of the connection pool
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Opens TLS-only connection pools to PostgreSQL.
pub struct PgConnector {
    options: PgConnectOptions,
    connect_timeout: Duration,
    idle_timeout: Duration,
    max_connections: u32,
}

impl PgConnector {
    /// Create a connector from a `postgres://` URL.
    ///
    /// Certificate and hostname verification is always enforced
    /// (`sslmode=verify-full`), whatever the URL says.
    pub fn new(
        database_url: &str,
        connect_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, ConnectionError> {
        let options = PgConnectOptions::from_str(database_url)
            .map_err(|e| ConnectionError::Config(e.to_string()))?
            .ssl_mode(PgSslMode::VerifyFull);

        Ok(Self {
            options,
            connect_timeout,
            idle_timeout,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        })
    }

    /// Override the pool size
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }
}

#[async_trait]
impl Connector for PgConnector {
    type Handle = PgSessionRepository;

    async fn connect(&self) -> Result<Self::Handle, ConnectionError> {
        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.connect_timeout)
            .idle_timeout(Some(self.idle_timeout))
            .connect_with(self.options.clone())
            .await
            .map_err(|e| ConnectionError::Connect(e.to_string()))?;

        let repository = PgSessionRepository::new(pool);
        repository
            .migrate()
            .await
            .map_err(|e| ConnectionError::Connect(format!("schema setup failed: {e}")))?;

        Ok(repository)
    }

    async fn ping(&self, handle: &Self::Handle) -> Result<(), ConnectionError> {
        sqlx::query("SELECT 1")
            .execute(handle.pool())
            .await
            .map(|_| ())
            .map_err(|e| ConnectionError::HealthCheck(e.to_string()))
    }

    async fn close(&self, handle: Self::Handle) {
        handle.pool().close().await;
    }
}
