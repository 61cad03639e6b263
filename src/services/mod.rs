//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories and handlers.

mod explorer_service;
mod settings_service;

pub use explorer_service::ExplorerService;
pub use settings_service::SettingsService;

use crate::db::AsyncDbPool;
use crate::explorer::QueryEngine;
use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// This struct is designed to be used as Axum application state.
/// Cloning is cheap since underlying pools use `Arc` internally.
#[derive(Clone)]
pub struct Services {
    pub explorer: ExplorerService,
    pub settings: SettingsService,
}

impl Services {
    /// Creates a new Services instance from the pool and repositories.
    pub fn new(pool: AsyncDbPool, repos: &Repositories) -> Self {
        Self {
            explorer: ExplorerService::new(QueryEngine::new(pool)),
            settings: SettingsService::new(repos.settings.clone()),
        }
    }
}
