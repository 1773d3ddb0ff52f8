//! Session repository backed by a [`ConnectionManager`].
//!
//! Every call asks the manager for the current handle, so requests fail fast
//! with `Unavailable` while the store is disconnected, and every call is
//! bounded by the operation timeout. Only a lost connection is reported back
//! to the manager, which drops it and starts reconnecting. A busy store
//! (timeouts, exhausted pool) keeps its connection.

use std::{future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;

use crate::{
    domain::{
        Coordinates, CreateOutcome, PhoneNumber, RepositoryError, Session, SessionRepository,
        TrackingId,
    },
    infrastructure::connection::{ConnectionManager, Connector},
};

/// Default bound for a single store operation
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

pub struct ManagedSessionRepository<C: Connector> {
    manager: Arc<ConnectionManager<C>>,
    operation_timeout: Duration,
}

impl<C> ManagedSessionRepository<C>
where
    C: Connector,
    C::Handle: SessionRepository,
{
    pub fn new(manager: Arc<ConnectionManager<C>>, operation_timeout: Duration) -> Self {
        Self {
            manager,
            operation_timeout,
        }
    }

    async fn with_handle<T, F, Fut>(&self, operation: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(C::Handle) -> Fut + Send,
        Fut: Future<Output = Result<T, RepositoryError>> + Send,
        T: Send,
    {
        let handle = self
            .manager
            .current()
            .await
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))?;

        match tokio::time::timeout(self.operation_timeout, operation(handle)).await {
            Ok(Err(RepositoryError::ConnectionLost(reason))) => {
                tracing::warn!(%reason, "Session store transport failure");
                self.manager.report_failure();
                Err(RepositoryError::Unavailable(reason))
            }
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.operation_timeout.as_secs_f64(),
                    "Session store operation timed out"
                );
                Err(RepositoryError::Unavailable(format!(
                    "operation timed out after {:?}",
                    self.operation_timeout
                )))
            }
        }
    }
}

#[async_trait]
impl<C> SessionRepository for ManagedSessionRepository<C>
where
    C: Connector,
    C::Handle: SessionRepository,
{
    async fn find_by_phone(&self, phone: &PhoneNumber) -> Result<Option<Session>, RepositoryError> {
        self.with_handle(|store| async move { store.find_by_phone(phone).await })
            .await
    }

    async fn find_by_tracking_id(
        &self,
        tracking_id: &TrackingId,
    ) -> Result<Option<Session>, RepositoryError> {
        self.with_handle(|store| async move { store.find_by_tracking_id(tracking_id).await })
            .await
    }

    async fn create_session(
        &self,
        phone: &PhoneNumber,
        tracking_id: &TrackingId,
    ) -> Result<CreateOutcome, RepositoryError> {
        self.with_handle(|store| async move { store.create_session(phone, tracking_id).await })
            .await
    }

    async fn update_location(
        &self,
        tracking_id: &TrackingId,
        coordinates: Coordinates,
    ) -> Result<Session, RepositoryError> {
        self.with_handle(
            |store| async move { store.update_location(tracking_id, coordinates).await },
        )
        .await
    }
}
