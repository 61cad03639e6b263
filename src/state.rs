//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use std::sync::Arc;

use crate::db::AsyncDbPool;
use crate::repositories::Repositories;
use crate::scheduler::{PgSchedulerStore, TemplateWorkItemGenerator, TenantScheduler};
use crate::services::Services;

/// Application state containing all shared services and resources.
///
/// This struct is designed to be used with Axum's State extractor.
/// Cloning is cheap since services, the pool and the scheduler all sit
/// behind `Arc` internally.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
    /// Direct access to the database connection pool
    pub db_pool: AsyncDbPool,
    /// Per-tenant timer owner, shared with the server lifecycle
    pub scheduler: Arc<TenantScheduler>,
}

impl AppState {
    /// Creates a new AppState from a database connection pool.
    ///
    /// Initializes repositories, services, and the tenant scheduler.
    /// The scheduler is created idle; the server decides whether to
    /// start its timers.
    pub fn new(pool: AsyncDbPool, default_lookahead_days: i32) -> Self {
        let repos = Repositories::new(pool.clone(), default_lookahead_days);
        let services = Services::new(pool.clone(), &repos);
        let scheduler = Arc::new(TenantScheduler::new(
            Arc::new(PgSchedulerStore::new(repos)),
            Arc::new(TemplateWorkItemGenerator::new(pool.clone())),
            default_lookahead_days,
        ));
        Self {
            services,
            db_pool: pool,
            scheduler,
        }
    }
}
