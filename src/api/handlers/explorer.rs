//! Explorer request handlers.
//!
//! Exposes the registered tables, their queryable fields, and the dynamic
//! count endpoint. Every handler is tenant-scoped through `OrgContext`.

use axum::{
    Json,
    extract::{Path, State},
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::EXPLORER_TAG;
use crate::api::dto::{ErrorResponse, FieldResponse, QueryRequest, QueryResponse, TableResponse};
use crate::api::middleware::OrgContext;
use crate::error::AppResult;
use crate::state::AppState;

/// Creates explorer routes.
pub fn explorer_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_tables))
        .routes(routes!(list_fields))
        .routes(routes!(run_query))
}

/// GET /api/explorer/tables - List registered tables
#[utoipa::path(
    get,
    path = "/tables",
    tag = EXPLORER_TAG,
    responses(
        (status = 200, description = "Registered tables", body = Vec<TableResponse>)
    )
)]
async fn list_tables(State(state): State<AppState>) -> Json<Vec<TableResponse>> {
    let tables = state
        .services
        .explorer
        .tables()
        .iter()
        .map(TableResponse::from)
        .collect();
    Json(tables)
}

/// GET /api/explorer/tables/{table_name}/fields - List queryable fields
#[utoipa::path(
    get,
    path = "/tables/{table_name}/fields",
    tag = EXPLORER_TAG,
    params(
        ("table_name" = String, Path, description = "Registered table name")
    ),
    responses(
        (status = 200, description = "Queryable fields", body = Vec<FieldResponse>),
        (status = 404, description = "Table is not registered", body = ErrorResponse)
    )
)]
async fn list_fields(
    State(state): State<AppState>,
    Path(table_name): Path<String>,
) -> AppResult<Json<Vec<FieldResponse>>> {
    let table = state.services.explorer.table(&table_name)?;
    let fields = table.columns.iter().map(FieldResponse::from).collect();
    Ok(Json(fields))
}

/// POST /api/explorer/query - Run a tenant-scoped count query
///
/// The organization comes from the X-Organization-Id header; filters in
/// the body can only narrow the result within that organization.
#[utoipa::path(
    post,
    path = "/query",
    tag = EXPLORER_TAG,
    request_body = QueryRequest,
    responses(
        (status = 200, description = "Count result", body = QueryResponse),
        (status = 400, description = "Invalid filter or operator", body = ErrorResponse),
        (status = 404, description = "Table or field is not registered", body = ErrorResponse)
    )
)]
async fn run_query(
    State(state): State<AppState>,
    OrgContext(org_id): OrgContext,
    Json(payload): Json<QueryRequest>,
) -> AppResult<Json<QueryResponse>> {
    let (table, config) = payload.into_config();
    let outcome = state.services.explorer.count(org_id, &table, &config).await?;

    tracing::debug!(
        org_id,
        table = %table,
        count = outcome.count,
        duration_ms = outcome.duration_ms,
        filters = outcome.filter_count,
        "explorer query finished"
    );

    Ok(Json(QueryResponse::from_outcome(&table, outcome)))
}
