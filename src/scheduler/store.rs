//! Persistence seam for the tenant scheduler.
//!
//! The scheduler only needs a narrow view of the database: which
//! organizations exist, their scheduling strategy, and a place to write
//! bookkeeping. Keeping that behind a trait lets tests drive the scheduler
//! with in-memory doubles.

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::NewActivityLog;
use crate::repositories::Repositories;

/// Scheduling strategy for one organization, as the scheduler sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgSchedule {
    pub cron_enabled: bool,
    pub cron_schedule: Option<String>,
    pub auto_generate_work_items: bool,
    pub lookahead_days: i32,
}

#[async_trait]
pub trait SchedulerStore: Send + Sync {
    /// Loads the scheduling strategy for an organization, if any.
    async fn load_schedule(&self, org_id: i32) -> AppResult<Option<OrgSchedule>>;

    /// Lists all organization ids known to the system.
    async fn active_org_ids(&self) -> AppResult<Vec<i32>>;

    /// Stamps last_cron_execution for an organization.
    async fn record_execution(&self, org_id: i32) -> AppResult<()>;

    /// Resolves the id of the organization's first admin user, if any.
    async fn first_admin(&self, org_id: i32) -> AppResult<Option<i32>>;

    /// Writes an activity-log entry.
    async fn log_activity(&self, entry: NewActivityLog) -> AppResult<()>;
}

/// Diesel-backed store used in production
#[derive(Clone)]
pub struct PgSchedulerStore {
    repos: Repositories,
}

impl PgSchedulerStore {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }
}

#[async_trait]
impl SchedulerStore for PgSchedulerStore {
    async fn load_schedule(&self, org_id: i32) -> AppResult<Option<OrgSchedule>> {
        let settings = self.repos.settings.find_by_org(org_id).await?;
        Ok(settings.map(|s| OrgSchedule {
            cron_enabled: s.cron_enabled,
            cron_schedule: s.cron_schedule,
            auto_generate_work_items: s.auto_generate_work_items,
            lookahead_days: s.lookahead_days,
        }))
    }

    async fn active_org_ids(&self) -> AppResult<Vec<i32>> {
        self.repos.organizations.list_ids().await
    }

    async fn record_execution(&self, org_id: i32) -> AppResult<()> {
        self.repos.settings.record_execution(org_id).await
    }

    async fn first_admin(&self, org_id: i32) -> AppResult<Option<i32>> {
        let admin = self.repos.users.first_admin_for_org(org_id).await?;
        Ok(admin.map(|u| u.id))
    }

    async fn log_activity(&self, entry: NewActivityLog) -> AppResult<()> {
        self.repos.activity_logs.create(entry).await?;
        Ok(())
    }
}
