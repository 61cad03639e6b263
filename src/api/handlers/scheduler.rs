//! Scheduler request handlers.

use axum::{Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::SCHEDULER_TAG;
use crate::api::dto::{
    ErrorResponse, SchedulerStatusResponse, TriggerRunRequest, TriggerRunResponse,
};
use crate::api::middleware::OrgContext;
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::ValidatedJson;

/// Creates scheduler routes.
pub fn scheduler_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(trigger_run))
        .routes(routes!(status))
}

/// POST /api/scheduler/run - Trigger a generation run immediately
///
/// Runs outside any timer and regardless of the auto-generate flag. An
/// optional lookahead override applies to this run only.
#[utoipa::path(
    post,
    path = "/run",
    tag = SCHEDULER_TAG,
    request_body = TriggerRunRequest,
    responses(
        (status = 200, description = "Run finished", body = TriggerRunResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Generation failed", body = ErrorResponse)
    )
)]
async fn trigger_run(
    State(state): State<AppState>,
    OrgContext(org_id): OrgContext,
    ValidatedJson(payload): ValidatedJson<TriggerRunRequest>,
) -> AppResult<Json<TriggerRunResponse>> {
    let outcome = state
        .scheduler
        .trigger_generation(org_id, payload.lookahead_days)
        .await?;

    tracing::info!(org_id, created = outcome.created, "manual generation run finished");

    Ok(Json(TriggerRunResponse::from(outcome)))
}

/// GET /api/scheduler/status - Inspect timer state
#[utoipa::path(
    get,
    path = "/status",
    tag = SCHEDULER_TAG,
    responses(
        (status = 200, description = "Scheduler status", body = SchedulerStatusResponse)
    )
)]
async fn status(
    State(state): State<AppState>,
    OrgContext(org_id): OrgContext,
) -> Json<SchedulerStatusResponse> {
    Json(SchedulerStatusResponse {
        scheduled: state.scheduler.is_scheduled(org_id),
        active_timers: state.scheduler.active_timer_count(),
    })
}
