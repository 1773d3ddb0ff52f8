//! Server state shared by all handlers.

use std::sync::Arc;

use crate::{
    domain::SessionRepository,
    infrastructure::{connection::ConnectionControl, link::ShareLinks},
    usecase::{CreateOrGetLinkUseCase, GetLocationUseCase, UpdateLocationUseCase},
};

/// Shared application state
pub struct AppState {
    /// Repository（データアクセス層の抽象化）
    pub repository: Arc<dyn SessionRepository>,
    /// Connection manager of the session store (state only)
    pub connection: Arc<dyn ConnectionControl>,
    /// Share link builder
    pub links: ShareLinks,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        connection: Arc<dyn ConnectionControl>,
        links: ShareLinks,
    ) -> Self {
        Self {
            repository,
            connection,
            links,
        }
    }

    pub fn create_or_get_link(&self) -> CreateOrGetLinkUseCase {
        CreateOrGetLinkUseCase::new(self.repository.clone(), self.links.clone())
    }

    pub fn get_location(&self) -> GetLocationUseCase {
        GetLocationUseCase::new(self.repository.clone())
    }

    pub fn update_location(&self) -> UpdateLocationUseCase {
        UpdateLocationUseCase::new(self.repository.clone())
    }
}
