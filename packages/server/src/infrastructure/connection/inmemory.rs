//! Connector for the in-memory session store.

use async_trait::async_trait;

use super::manager::{ConnectionError, Connector};
use crate::infrastructure::repository::InMemorySessionRepository;

/// Always-available connector handing out a shared in-memory store.
///
/// Used when no database URL is configured and in tests.
#[derive(Clone, Default)]
pub struct InMemoryConnector {
    store: InMemorySessionRepository,
}

impl InMemoryConnector {
    pub fn new(store: InMemorySessionRepository) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Connector for InMemoryConnector {
    type Handle = InMemorySessionRepository;

    async fn connect(&self) -> Result<Self::Handle, ConnectionError> {
        Ok(self.store.clone())
    }

    async fn ping(&self, _handle: &Self::Handle) -> Result<(), ConnectionError> {
        Ok(())
    }
}
