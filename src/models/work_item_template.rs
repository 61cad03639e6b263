use diesel::prelude::*;
use jiff_diesel::DateTime;

/// Recurring work item template model
///
/// Each enabled template produces a work item whenever its `next_run_on`
/// falls within an organization's lookahead window.
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::work_item_templates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WorkItemTemplate {
    pub id: i32,
    pub organization_id: i32,
    pub title: String,
    pub cadence_days: i32,
    pub next_run_on: DateTime,
    pub enabled: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}
