//! Strategy settings service.

use crate::error::AppResult;
use crate::models::{StrategySettings, UpdateStrategySettings};
use crate::repositories::StrategySettingsRepository;

/// Business-level access to per-organization scheduling strategy.
///
/// Reads create a disabled default row on first access so every
/// organization always has exactly one settings row.
#[derive(Clone)]
pub struct SettingsService {
    repo: StrategySettingsRepository,
}

impl SettingsService {
    pub fn new(repo: StrategySettingsRepository) -> Self {
        Self { repo }
    }

    /// Returns the organization's settings, creating defaults when absent.
    pub async fn get_settings(&self, org_id: i32) -> AppResult<StrategySettings> {
        self.repo.get_or_create(org_id).await
    }

    /// Applies a partial update and returns the new state.
    ///
    /// The caller is responsible for rescheduling the organization's timer
    /// afterwards; persistence and timer state are deliberately decoupled.
    pub async fn update_settings(
        &self,
        org_id: i32,
        update: UpdateStrategySettings,
    ) -> AppResult<StrategySettings> {
        self.repo.upsert_for_org(org_id, update).await
    }
}
