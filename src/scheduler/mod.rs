//! Per-tenant scheduling loop.
//!
//! Each organization with cron enabled gets one repeating tokio timer whose
//! period comes from the cron heuristic. Timer state lives only in memory
//! and is rebuilt from the settings table at startup.

pub mod cron;
pub mod generation;
pub mod store;

pub use cron::{DAILY_INTERVAL_MS, HOURLY_INTERVAL_MS, parse_cron_to_ms};
pub use generation::{GenerationOutcome, TemplateWorkItemGenerator, WorkItemGenerator};
pub use store::{OrgSchedule, PgSchedulerStore, SchedulerStore};

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::task::JoinHandle;

use crate::error::{AppError, AppResult};
use crate::models::NewActivityLog;

/// Actor recorded when an organization has no admin user.
const FALLBACK_SYSTEM_USER_ID: i32 = 1;

const ACTION_GENERATED: &str = "work_items.generated";
const ACTION_GENERATION_FAILED: &str = "work_items.generation_failed";

/// Owns one repeating timer per organization.
///
/// All methods are safe to call concurrently; the timer map is the only
/// shared state. Overlapping fires for a single organization are possible
/// and not prevented.
pub struct TenantScheduler {
    timers: DashMap<i32, JoinHandle<()>>,
    store: Arc<dyn SchedulerStore>,
    generator: Arc<dyn WorkItemGenerator>,
    /// Window applied when neither the caller nor a settings row supplies one
    default_lookahead_days: i32,
}

impl TenantScheduler {
    pub fn new(
        store: Arc<dyn SchedulerStore>,
        generator: Arc<dyn WorkItemGenerator>,
        default_lookahead_days: i32,
    ) -> Self {
        Self {
            timers: DashMap::new(),
            store,
            generator,
            default_lookahead_days,
        }
    }

    /// Installs timers for every known organization.
    ///
    /// Per-organization failures are logged and skipped so one bad tenant
    /// cannot block startup.
    pub async fn start(&self) -> AppResult<()> {
        let org_ids = self.store.active_org_ids().await?;
        let total = org_ids.len();

        for org_id in org_ids {
            if let Err(error) = self.schedule_for_org(org_id).await {
                tracing::error!(org_id, %error, "failed to schedule organization");
            }
        }

        tracing::info!(
            organizations = total,
            timers = self.active_timer_count(),
            "tenant scheduler started"
        );
        Ok(())
    }

    /// Installs (or removes) the timer for one organization based on its
    /// current settings. Idempotent: an existing timer is always cancelled
    /// first, so at most one timer per organization exists.
    pub async fn schedule_for_org(&self, org_id: i32) -> AppResult<()> {
        let schedule = self
            .store
            .load_schedule(org_id)
            .await
            .map_err(|e| AppError::Scheduling {
                org_id,
                source: anyhow::Error::from(e),
            })?;

        self.cancel(org_id);

        let Some(schedule) = schedule else {
            tracing::debug!(org_id, "no strategy settings, timer not installed");
            return Ok(());
        };
        if !schedule.cron_enabled {
            tracing::debug!(org_id, "cron disabled, timer not installed");
            return Ok(());
        }

        let period = Duration::from_millis(parse_cron_to_ms(schedule.cron_schedule.as_deref()));
        let store = Arc::clone(&self.store);
        let generator = Arc::clone(&self.generator);

        // First fire happens one full interval after scheduling, anchored
        // here rather than at the task's first poll.
        let first_fire = tokio::time::Instant::now() + period;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(first_fire, period);
            loop {
                ticker.tick().await;

                if !schedule.auto_generate_work_items {
                    if let Err(error) = store.record_execution(org_id).await {
                        tracing::error!(org_id, %error, "failed to record scheduled run");
                    }
                    continue;
                }

                match run_generation(&*store, &*generator, org_id, schedule.lookahead_days).await {
                    Ok(outcome) => {
                        tracing::info!(org_id, created = outcome.created, "scheduled run finished");
                    }
                    Err(error) => {
                        tracing::error!(org_id, %error, "scheduled run failed");
                    }
                }
            }
        });

        self.timers.insert(org_id, handle);
        tracing::info!(
            org_id,
            period_ms = period.as_millis() as u64,
            "timer installed"
        );
        Ok(())
    }

    /// Re-reads settings and replaces the organization's timer.
    pub async fn reschedule_for_org(&self, org_id: i32) -> AppResult<()> {
        self.schedule_for_org(org_id).await
    }

    /// Runs a generation pass immediately, outside any timer.
    pub async fn trigger_generation(
        &self,
        org_id: i32,
        lookahead_days: Option<i32>,
    ) -> AppResult<GenerationOutcome> {
        let schedule = self
            .store
            .load_schedule(org_id)
            .await
            .map_err(|e| AppError::Scheduling {
                org_id,
                source: anyhow::Error::from(e),
            })?;

        let lookahead = lookahead_days
            .or(schedule.map(|s| s.lookahead_days))
            .unwrap_or(self.default_lookahead_days);

        run_generation(&*self.store, &*self.generator, org_id, lookahead).await
    }

    /// Aborts every timer and clears the map.
    pub fn stop_all(&self) {
        let count = self.timers.len();
        for entry in self.timers.iter() {
            entry.value().abort();
        }
        self.timers.clear();
        tracing::info!(timers = count, "tenant scheduler stopped");
    }

    pub fn is_scheduled(&self, org_id: i32) -> bool {
        self.timers.contains_key(&org_id)
    }

    pub fn active_timer_count(&self) -> usize {
        self.timers.len()
    }

    fn cancel(&self, org_id: i32) {
        if let Some((_, handle)) = self.timers.remove(&org_id) {
            handle.abort();
        }
    }
}

impl Drop for TenantScheduler {
    fn drop(&mut self) {
        for entry in self.timers.iter() {
            entry.value().abort();
        }
    }
}

/// One generation pass with its bookkeeping.
///
/// Success stamps last_cron_execution and, when items were created, writes
/// an activity entry attributed to the organization's first admin (falling
/// back to user id 1). Failure writes a failure entry and leaves
/// last_cron_execution untouched. No retry either way.
async fn run_generation(
    store: &dyn SchedulerStore,
    generator: &dyn WorkItemGenerator,
    org_id: i32,
    lookahead_days: i32,
) -> AppResult<GenerationOutcome> {
    match generator.generate(org_id, lookahead_days).await {
        Ok(outcome) => {
            store.record_execution(org_id).await?;

            if outcome.created > 0 {
                let actor = store
                    .first_admin(org_id)
                    .await?
                    .unwrap_or(FALLBACK_SYSTEM_USER_ID);
                store
                    .log_activity(NewActivityLog {
                        organization_id: org_id,
                        user_id: actor,
                        action: ACTION_GENERATED.to_string(),
                        detail: Some(format!("created {} work item(s)", outcome.created)),
                    })
                    .await?;
            }

            Ok(outcome)
        }
        Err(error) => {
            let entry = NewActivityLog {
                organization_id: org_id,
                user_id: FALLBACK_SYSTEM_USER_ID,
                action: ACTION_GENERATION_FAILED.to_string(),
                detail: Some(error.to_string()),
            };
            if let Err(log_error) = store.log_activity(entry).await {
                tracing::error!(org_id, %log_error, "failed to write failure activity entry");
            }
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        schedules: Mutex<HashMap<i32, OrgSchedule>>,
        failing_orgs: Mutex<Vec<i32>>,
        executions: Mutex<Vec<i32>>,
        activities: Mutex<Vec<NewActivityLog>>,
        admins: Mutex<HashMap<i32, i32>>,
    }

    impl MemoryStore {
        fn with_schedule(org_id: i32, schedule: OrgSchedule) -> Arc<Self> {
            let store = Arc::new(Self::default());
            store.set_schedule(org_id, schedule);
            store
        }

        fn set_schedule(&self, org_id: i32, schedule: OrgSchedule) {
            self.schedules.lock().unwrap().insert(org_id, schedule);
        }
    }

    fn enabled_schedule() -> OrgSchedule {
        OrgSchedule {
            cron_enabled: true,
            cron_schedule: Some("*/15 * * * *".to_string()),
            auto_generate_work_items: true,
            lookahead_days: 14,
        }
    }

    #[async_trait::async_trait]
    impl SchedulerStore for MemoryStore {
        async fn load_schedule(&self, org_id: i32) -> AppResult<Option<OrgSchedule>> {
            if self.failing_orgs.lock().unwrap().contains(&org_id) {
                return Err(AppError::Internal {
                    source: anyhow::anyhow!("settings unavailable"),
                });
            }
            Ok(self.schedules.lock().unwrap().get(&org_id).cloned())
        }

        async fn active_org_ids(&self) -> AppResult<Vec<i32>> {
            let mut ids: Vec<i32> = self
                .schedules
                .lock()
                .unwrap()
                .keys()
                .copied()
                .chain(self.failing_orgs.lock().unwrap().iter().copied())
                .collect();
            ids.sort_unstable();
            ids.dedup();
            Ok(ids)
        }

        async fn record_execution(&self, org_id: i32) -> AppResult<()> {
            self.executions.lock().unwrap().push(org_id);
            Ok(())
        }

        async fn first_admin(&self, org_id: i32) -> AppResult<Option<i32>> {
            Ok(self.admins.lock().unwrap().get(&org_id).copied())
        }

        async fn log_activity(&self, entry: NewActivityLog) -> AppResult<()> {
            self.activities.lock().unwrap().push(entry);
            Ok(())
        }
    }

    struct StubGenerator {
        created: usize,
        fail: bool,
        last_lookahead: Mutex<Option<i32>>,
    }

    impl StubGenerator {
        fn creating(created: usize) -> Arc<Self> {
            Arc::new(Self {
                created,
                fail: false,
                last_lookahead: Mutex::new(None),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                created: 0,
                fail: true,
                last_lookahead: Mutex::new(None),
            })
        }
    }

    #[async_trait::async_trait]
    impl WorkItemGenerator for StubGenerator {
        async fn generate(&self, _org_id: i32, lookahead: i32) -> AppResult<GenerationOutcome> {
            *self.last_lookahead.lock().unwrap() = Some(lookahead);
            if self.fail {
                return Err(AppError::Database {
                    operation: "insert work items".to_string(),
                    source: anyhow::anyhow!("relation unavailable"),
                });
            }
            Ok(GenerationOutcome {
                created: self.created,
            })
        }
    }

    fn scheduler(store: &Arc<MemoryStore>, generator: Arc<StubGenerator>) -> TenantScheduler {
        TenantScheduler::new(Arc::clone(store) as Arc<dyn SchedulerStore>, generator, 14)
    }

    #[tokio::test]
    async fn test_schedule_twice_leaves_single_timer() {
        let store = MemoryStore::with_schedule(1, enabled_schedule());
        let s = scheduler(&store, StubGenerator::creating(0));

        s.schedule_for_org(1).await.unwrap();
        s.schedule_for_org(1).await.unwrap();

        assert!(s.is_scheduled(1));
        assert_eq!(s.active_timer_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_settings_installs_nothing() {
        let store = Arc::new(MemoryStore::default());
        let s = scheduler(&store, StubGenerator::creating(0));

        s.schedule_for_org(1).await.unwrap();

        assert!(!s.is_scheduled(1));
        assert_eq!(s.active_timer_count(), 0);
    }

    #[tokio::test]
    async fn test_disabling_cron_cancels_existing_timer() {
        let store = MemoryStore::with_schedule(1, enabled_schedule());
        let s = scheduler(&store, StubGenerator::creating(0));

        s.schedule_for_org(1).await.unwrap();
        assert!(s.is_scheduled(1));

        store.set_schedule(
            1,
            OrgSchedule {
                cron_enabled: false,
                ..enabled_schedule()
            },
        );
        s.reschedule_for_org(1).await.unwrap();

        assert!(!s.is_scheduled(1));
        assert_eq!(s.active_timer_count(), 0);
    }

    #[tokio::test]
    async fn test_removing_settings_cancels_existing_timer() {
        let store = MemoryStore::with_schedule(1, enabled_schedule());
        let s = scheduler(&store, StubGenerator::creating(0));

        s.schedule_for_org(1).await.unwrap();
        assert!(s.is_scheduled(1));

        store.schedules.lock().unwrap().remove(&1);
        s.reschedule_for_org(1).await.unwrap();

        assert!(!s.is_scheduled(1));
    }

    #[tokio::test]
    async fn test_stop_all_empties_map() {
        let store = MemoryStore::with_schedule(1, enabled_schedule());
        store.set_schedule(2, enabled_schedule());
        let s = scheduler(&store, StubGenerator::creating(0));

        s.schedule_for_org(1).await.unwrap();
        s.schedule_for_org(2).await.unwrap();
        assert_eq!(s.active_timer_count(), 2);

        s.stop_all();
        assert_eq!(s.active_timer_count(), 0);
        assert!(!s.is_scheduled(1));
    }

    #[tokio::test]
    async fn test_start_skips_failing_org() {
        let store = MemoryStore::with_schedule(1, enabled_schedule());
        store.failing_orgs.lock().unwrap().push(2);
        let s = scheduler(&store, StubGenerator::creating(0));

        s.start().await.unwrap();

        assert!(s.is_scheduled(1));
        assert!(!s.is_scheduled(2));
        assert_eq!(s.active_timer_count(), 1);
    }

    #[tokio::test]
    async fn test_start_skips_disabled_org() {
        let store = MemoryStore::with_schedule(1, enabled_schedule());
        store.set_schedule(
            2,
            OrgSchedule {
                cron_enabled: false,
                ..enabled_schedule()
            },
        );
        let s = scheduler(&store, StubGenerator::creating(0));

        s.start().await.unwrap();

        assert_eq!(s.active_timer_count(), 1);
        assert!(s.is_scheduled(1));
    }

    #[tokio::test]
    async fn test_trigger_generation_records_and_logs_with_admin() {
        let store = MemoryStore::with_schedule(1, enabled_schedule());
        store.admins.lock().unwrap().insert(1, 42);
        let s = scheduler(&store, StubGenerator::creating(3));

        let outcome = s.trigger_generation(1, None).await.unwrap();
        assert_eq!(outcome.created, 3);

        assert_eq!(store.executions.lock().unwrap().as_slice(), &[1]);
        let activities = store.activities.lock().unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].user_id, 42);
        assert_eq!(activities[0].action, ACTION_GENERATED);
        assert_eq!(activities[0].detail.as_deref(), Some("created 3 work item(s)"));
    }

    #[tokio::test]
    async fn test_trigger_generation_falls_back_to_system_user() {
        let store = MemoryStore::with_schedule(1, enabled_schedule());
        let s = scheduler(&store, StubGenerator::creating(1));

        s.trigger_generation(1, None).await.unwrap();

        let activities = store.activities.lock().unwrap();
        assert_eq!(activities[0].user_id, FALLBACK_SYSTEM_USER_ID);
    }

    #[tokio::test]
    async fn test_trigger_generation_zero_created_skips_activity_log() {
        let store = MemoryStore::with_schedule(1, enabled_schedule());
        let s = scheduler(&store, StubGenerator::creating(0));

        s.trigger_generation(1, None).await.unwrap();

        assert_eq!(store.executions.lock().unwrap().len(), 1);
        assert!(store.activities.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_trigger_generation_without_settings_uses_default_lookahead() {
        let store = Arc::new(MemoryStore::default());
        let generator = StubGenerator::creating(0);
        let s = scheduler(&store, Arc::clone(&generator));

        // No settings row: the manual trigger still runs, with the default
        // 14 day window.
        let outcome = s.trigger_generation(7, None).await.unwrap();
        assert_eq!(outcome.created, 0);
        assert_eq!(store.executions.lock().unwrap().as_slice(), &[7]);
        assert_eq!(*generator.last_lookahead.lock().unwrap(), Some(14));
    }

    #[tokio::test]
    async fn test_configured_default_lookahead_reaches_generator() {
        let store = Arc::new(MemoryStore::default());
        let generator = StubGenerator::creating(0);
        let s = TenantScheduler::new(
            Arc::clone(&store) as Arc<dyn SchedulerStore>,
            Arc::clone(&generator) as Arc<dyn WorkItemGenerator>,
            30,
        );

        s.trigger_generation(7, None).await.unwrap();
        assert_eq!(*generator.last_lookahead.lock().unwrap(), Some(30));
    }

    #[tokio::test]
    async fn test_settings_lookahead_beats_configured_default() {
        let store = MemoryStore::with_schedule(
            1,
            OrgSchedule {
                lookahead_days: 21,
                ..enabled_schedule()
            },
        );
        let generator = StubGenerator::creating(0);
        let s = TenantScheduler::new(
            Arc::clone(&store) as Arc<dyn SchedulerStore>,
            Arc::clone(&generator) as Arc<dyn WorkItemGenerator>,
            30,
        );

        s.trigger_generation(1, None).await.unwrap();
        assert_eq!(*generator.last_lookahead.lock().unwrap(), Some(21));
    }

    #[tokio::test]
    async fn test_generation_failure_logs_without_recording_execution() {
        let store = MemoryStore::with_schedule(1, enabled_schedule());
        let s = scheduler(&store, StubGenerator::failing());

        let err = s.trigger_generation(1, None).await.unwrap_err();
        assert!(matches!(err, AppError::Database { .. }));

        assert!(store.executions.lock().unwrap().is_empty());
        let activities = store.activities.lock().unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].action, ACTION_GENERATION_FAILED);
        assert_eq!(activities[0].user_id, FALLBACK_SYSTEM_USER_ID);
        assert!(activities[0].detail.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_waits_one_full_interval_before_first_fire() {
        let store = MemoryStore::with_schedule(1, enabled_schedule());
        let s = scheduler(&store, StubGenerator::creating(1));

        s.schedule_for_org(1).await.unwrap();

        // Nothing fires before the first interval elapses.
        tokio::time::advance(Duration::from_secs(60)).await;
        tokio::task::yield_now().await;
        assert!(store.executions.lock().unwrap().is_empty());

        // "*/15 * * * *" repeats every 15 minutes.
        tokio::time::advance(Duration::from_secs(15 * 60)).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(store.executions.lock().unwrap().as_slice(), &[1]);

        s.stop_all();
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_records_execution_when_generation_disabled() {
        let store = MemoryStore::with_schedule(
            1,
            OrgSchedule {
                auto_generate_work_items: false,
                ..enabled_schedule()
            },
        );
        let s = scheduler(&store, StubGenerator::creating(5));

        s.schedule_for_org(1).await.unwrap();

        tokio::time::advance(Duration::from_secs(16 * 60)).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        // The run is stamped but no generation happens.
        assert_eq!(store.executions.lock().unwrap().as_slice(), &[1]);
        assert!(store.activities.lock().unwrap().is_empty());

        s.stop_all();
    }
}
