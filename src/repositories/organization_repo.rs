use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::schema::organizations;

#[derive(Clone)]
pub struct OrganizationRepository {
    pool: AsyncDbPool,
}

impl OrganizationRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Lists the ids of all organizations, used to enumerate tenants at startup.
    pub async fn list_ids(&self) -> AppResult<Vec<i32>> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AppError::ConnectionPool {
                source: anyhow::Error::from(e),
            })?;

        organizations::table
            .select(organizations::id)
            .order(organizations::id.asc())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }
}
