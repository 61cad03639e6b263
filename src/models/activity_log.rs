use diesel::prelude::*;
use jiff_diesel::DateTime;

/// Activity log entry recording an action taken on behalf of an organization
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::activity_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ActivityLog {
    pub id: i64,
    pub organization_id: i32,
    pub user_id: i32,
    pub action: String,
    pub detail: Option<String>,
    pub created_at: DateTime,
}

/// NewActivityLog model for inserting new records
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::activity_logs)]
pub struct NewActivityLog {
    pub organization_id: i32,
    pub user_id: i32,
    pub action: String,
    pub detail: Option<String>,
}
