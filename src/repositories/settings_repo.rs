use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{NewStrategySettings, StrategySettings, UpdateStrategySettings};
use crate::schema::strategy_settings;

#[derive(Clone)]
pub struct StrategySettingsRepository {
    pool: AsyncDbPool,
    /// Lookahead window applied when a row is created implicitly
    default_lookahead_days: i32,
}

impl StrategySettingsRepository {
    pub fn new(pool: AsyncDbPool, default_lookahead_days: i32) -> Self {
        Self {
            pool,
            default_lookahead_days,
        }
    }

    /// Finds the settings row for an organization, if one exists.
    pub async fn find_by_org(&self, organization_id: i32) -> AppResult<Option<StrategySettings>> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AppError::ConnectionPool {
                source: anyhow::Error::from(e),
            })?;

        strategy_settings::table
            .filter(strategy_settings::organization_id.eq(organization_id))
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Returns the settings row for an organization, creating a disabled
    /// default row when none exists yet.
    pub async fn get_or_create(&self, organization_id: i32) -> AppResult<StrategySettings> {
        if let Some(settings) = self.find_by_org(organization_id).await? {
            return Ok(settings);
        }
        self.create_default(organization_id).await
    }

    /// Applies a partial update to an organization's settings, creating the
    /// row first when it does not exist.
    pub async fn upsert_for_org(
        &self,
        organization_id: i32,
        update: UpdateStrategySettings,
    ) -> AppResult<StrategySettings> {
        // Ensure the row exists before applying the changeset.
        self.get_or_create(organization_id).await?;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AppError::ConnectionPool {
                source: anyhow::Error::from(e),
            })?;

        diesel::update(
            strategy_settings::table
                .filter(strategy_settings::organization_id.eq(organization_id)),
        )
        .set((
            &update,
            strategy_settings::updated_at.eq(diesel::dsl::now),
        ))
        .get_result(&mut conn)
        .await
        .map_err(AppError::from)
    }

    /// Stamps last_cron_execution after a successful scheduled run.
    pub async fn record_execution(&self, organization_id: i32) -> AppResult<()> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AppError::ConnectionPool {
                source: anyhow::Error::from(e),
            })?;

        diesel::update(
            strategy_settings::table
                .filter(strategy_settings::organization_id.eq(organization_id)),
        )
        .set((
            strategy_settings::last_cron_execution.eq(diesel::dsl::now.nullable()),
            strategy_settings::updated_at.eq(diesel::dsl::now),
        ))
        .execute(&mut conn)
        .await
        .map_err(AppError::from)?;

        Ok(())
    }

    async fn create_default(&self, organization_id: i32) -> AppResult<StrategySettings> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AppError::ConnectionPool {
                source: anyhow::Error::from(e),
            })?;

        let row = NewStrategySettings {
            organization_id,
            cron_enabled: false,
            cron_schedule: None,
            auto_generate_work_items: false,
            lookahead_days: self.default_lookahead_days,
        };

        diesel::insert_into(strategy_settings::table)
            .values(&row)
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }
}
