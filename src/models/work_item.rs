use diesel::prelude::*;
use diesel_derive_enum::DbEnum;
use jiff_diesel::DateTime;
use serde::{Deserialize, Serialize};

/// Work item lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum)]
#[db_enum(existing_type_path = "crate::schema::sql_types::WorkItemStatus")]
#[serde(rename_all = "snake_case")]
pub enum WorkItemStatus {
    Open,
    InProgress,
    Done,
    Cancelled,
}

/// NewWorkItem model for inserting new records
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::work_items)]
pub struct NewWorkItem {
    pub organization_id: i32,
    pub template_id: Option<i32>,
    pub title: String,
    pub status: WorkItemStatus,
    pub assignee_id: Option<i32>,
    pub scheduled_for: Option<DateTime>,
    pub metadata: Option<serde_json::Value>,
}
