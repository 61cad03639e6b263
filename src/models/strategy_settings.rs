use diesel::prelude::*;
use jiff_diesel::DateTime;
use serde::Deserialize;

/// Per-organization scheduling strategy, one row per organization
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::strategy_settings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StrategySettings {
    pub id: i32,
    pub organization_id: i32,
    pub cron_enabled: bool,
    pub cron_schedule: Option<String>,
    pub auto_generate_work_items: bool,
    pub lookahead_days: i32,
    pub last_cron_execution: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// NewStrategySettings model for inserting the initial row for an organization
#[derive(Debug, Insertable, Deserialize, Clone)]
#[diesel(table_name = crate::schema::strategy_settings)]
pub struct NewStrategySettings {
    pub organization_id: i32,
    pub cron_enabled: bool,
    pub cron_schedule: Option<String>,
    pub auto_generate_work_items: bool,
    pub lookahead_days: i32,
}

/// UpdateStrategySettings model for partial updates
/// Derives AsChangeset for UPDATE operations with optional fields
#[derive(Debug, AsChangeset, Deserialize, Clone, Default)]
#[diesel(table_name = crate::schema::strategy_settings)]
pub struct UpdateStrategySettings {
    pub cron_enabled: Option<bool>,
    pub cron_schedule: Option<Option<String>>,
    pub auto_generate_work_items: Option<bool>,
    pub lookahead_days: Option<i32>,
}
