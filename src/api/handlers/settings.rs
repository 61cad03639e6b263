//! Strategy settings request handlers.

use axum::{Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::SETTINGS_TAG;
use crate::api::dto::{ErrorResponse, SettingsResponse, UpdateSettingsRequest};
use crate::api::middleware::OrgContext;
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::ValidatedJson;

/// Creates settings routes.
pub fn settings_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(get_settings, update_settings))
}

/// GET /api/settings - Read the organization's scheduling strategy
///
/// Creates a disabled default row on first access.
#[utoipa::path(
    get,
    path = "/",
    tag = SETTINGS_TAG,
    responses(
        (status = 200, description = "Current strategy settings", body = SettingsResponse),
        (status = 400, description = "Missing organization header", body = ErrorResponse)
    )
)]
async fn get_settings(
    State(state): State<AppState>,
    OrgContext(org_id): OrgContext,
) -> AppResult<Json<SettingsResponse>> {
    let settings = state.services.settings.get_settings(org_id).await?;
    Ok(Json(SettingsResponse::from(settings)))
}

/// PUT /api/settings - Update the organization's scheduling strategy
///
/// Persists the change, then replaces the organization's timer so the new
/// strategy takes effect without a restart.
#[utoipa::path(
    put,
    path = "/",
    tag = SETTINGS_TAG,
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Updated strategy settings", body = SettingsResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    )
)]
async fn update_settings(
    State(state): State<AppState>,
    OrgContext(org_id): OrgContext,
    ValidatedJson(payload): ValidatedJson<UpdateSettingsRequest>,
) -> AppResult<Json<SettingsResponse>> {
    let settings = state
        .services
        .settings
        .update_settings(org_id, payload.into_update())
        .await?;

    state.scheduler.reschedule_for_org(org_id).await?;

    Ok(Json(SettingsResponse::from(settings)))
}
