use utoipa::OpenApi;

pub const EXPLORER_TAG: &str = "Explorer";
pub const SETTINGS_TAG: &str = "Settings";
pub const SCHEDULER_TAG: &str = "Scheduler";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Strata",
        description = "Tenant-scoped data explorer and work item scheduling backend",
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
        )
    ),
    tags(
        (name = EXPLORER_TAG, description = "Dynamic count queries over registered tables"),
        (name = SETTINGS_TAG, description = "Per-organization scheduling strategy"),
        (name = SCHEDULER_TAG, description = "Timer state and manual generation runs"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
