use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{ActivityLog, NewActivityLog};
use crate::schema::activity_logs;

#[derive(Clone)]
pub struct ActivityLogRepository {
    pool: AsyncDbPool,
}

impl ActivityLogRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, entry: NewActivityLog) -> AppResult<ActivityLog> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AppError::ConnectionPool {
                source: anyhow::Error::from(e),
            })?;

        diesel::insert_into(activity_logs::table)
            .values(&entry)
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }
}
