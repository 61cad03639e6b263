use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{User, UserRole};
use crate::schema::users;

#[derive(Clone)]
pub struct UserRepository {
    pool: AsyncDbPool,
}

impl UserRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Finds the lowest-id admin of an organization, if any.
    ///
    /// Scheduled runs are attributed to this user in the activity log.
    pub async fn first_admin_for_org(&self, organization_id: i32) -> AppResult<Option<User>> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AppError::ConnectionPool {
                source: anyhow::Error::from(e),
            })?;

        users::table
            .filter(users::organization_id.eq(organization_id))
            .filter(users::role.eq(UserRole::Admin))
            .order(users::id.asc())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }
}
