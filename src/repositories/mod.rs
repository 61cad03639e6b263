//! Repository layer for data access operations.
//!
//! Provides async CRUD operations for all domain entities.

mod activity_log_repo;
mod organization_repo;
mod settings_repo;
mod user_repo;

pub use activity_log_repo::ActivityLogRepository;
pub use organization_repo::OrganizationRepository;
pub use settings_repo::StrategySettingsRepository;
pub use user_repo::UserRepository;

use crate::db::AsyncDbPool;

/// Aggregates all repositories for convenient access.
///
/// This struct is designed to be used as Axum application state.
/// Since `AsyncDbPool` uses `Arc` internally, cloning is cheap.
#[derive(Clone)]
pub struct Repositories {
    pub organizations: OrganizationRepository,
    pub users: UserRepository,
    pub settings: StrategySettingsRepository,
    pub activity_logs: ActivityLogRepository,
}

impl Repositories {
    /// Creates a new Repositories instance with all repositories initialized.
    pub fn new(pool: AsyncDbPool, default_lookahead_days: i32) -> Self {
        Self {
            organizations: OrganizationRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            settings: StrategySettingsRepository::new(pool.clone(), default_lookahead_days),
            activity_logs: ActivityLogRepository::new(pool),
        }
    }
}
