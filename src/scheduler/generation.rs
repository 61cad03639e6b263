//! Work item generation from recurring templates.

use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{Integer, Timestamp};
use diesel_async::RunQueryDsl;
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{NewWorkItem, WorkItemStatus, WorkItemTemplate};
use crate::schema::{work_item_templates, work_items};

/// Result of one generation run
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct GenerationOutcome {
    /// Number of work items created in this run
    pub created: usize,
}

/// Produces work items for an organization.
///
/// The scheduler treats the generator as opaque; any implementation error
/// is caught, logged, and does not affect the next fire.
#[async_trait]
pub trait WorkItemGenerator: Send + Sync {
    async fn generate(&self, org_id: i32, lookahead_days: i32) -> AppResult<GenerationOutcome>;
}

/// Production generator driven by `work_item_templates`.
///
/// Creates one work item for each enabled template whose `next_run_on`
/// falls within the lookahead window, then advances the template by its
/// cadence.
#[derive(Clone)]
pub struct TemplateWorkItemGenerator {
    pool: AsyncDbPool,
}

impl TemplateWorkItemGenerator {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

/// Maps due templates to the work items one run should insert.
fn items_from_templates(org_id: i32, due: &[WorkItemTemplate]) -> Vec<NewWorkItem> {
    due.iter()
        .map(|template| NewWorkItem {
            organization_id: org_id,
            template_id: Some(template.id),
            title: template.title.clone(),
            status: WorkItemStatus::Open,
            assignee_id: None,
            scheduled_for: Some(template.next_run_on.clone()),
            metadata: None,
        })
        .collect()
}

#[async_trait]
impl WorkItemGenerator for TemplateWorkItemGenerator {
    async fn generate(&self, org_id: i32, lookahead_days: i32) -> AppResult<GenerationOutcome> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AppError::ConnectionPool {
                source: anyhow::Error::from(e),
            })?;

        let window_end = sql::<Timestamp>("now() + make_interval(days => ")
            .bind::<Integer, _>(lookahead_days)
            .sql(")");

        let due: Vec<WorkItemTemplate> = work_item_templates::table
            .filter(work_item_templates::organization_id.eq(org_id))
            .filter(work_item_templates::enabled.eq(true))
            .filter(work_item_templates::next_run_on.le(window_end))
            .order(work_item_templates::id.asc())
            .load(&mut conn)
            .await
            .map_err(AppError::from)?;

        if due.is_empty() {
            return Ok(GenerationOutcome { created: 0 });
        }

        let new_items = items_from_templates(org_id, &due);

        let created = diesel::insert_into(work_items::table)
            .values(&new_items)
            .execute(&mut conn)
            .await
            .map_err(AppError::from)?;

        // Advance each consumed template by its own cadence.
        let ids: Vec<i32> = due.iter().map(|t| t.id).collect();
        diesel::update(work_item_templates::table.filter(work_item_templates::id.eq_any(ids)))
            .set((
                work_item_templates::next_run_on
                    .eq(sql::<Timestamp>("next_run_on + make_interval(days => cadence_days)")),
                work_item_templates::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)?;

        Ok(GenerationOutcome { created })
    }
}
