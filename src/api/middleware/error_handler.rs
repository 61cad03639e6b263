//! Error handler for converting AppError to HTTP responses.
//!
//! Implements the IntoResponse trait for AppError with consistent status
//! code mapping. Internal error sources are never serialized into
//! responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::dto::ErrorResponse;
use crate::error::AppError;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        let error_response = match &self {
            AppError::NotFound {
                entity,
                field,
                value,
            } => ErrorResponse::new(
                "NOT_FOUND",
                &format!("{entity} not found for {field}={value}"),
            ),
            AppError::Duplicate {
                entity,
                field,
                value,
            } => ErrorResponse::new(
                "DUPLICATE_ENTRY",
                &format!("{entity} with {field}='{value}' already exists"),
            ),
            AppError::Validation { field, reason } => {
                ErrorResponse::new("VALIDATION_ERROR", reason)
                    .with_details(json!({ "field": field }))
            }
            AppError::ValidationErrors { errors } => {
                ErrorResponse::new("VALIDATION_ERROR", "Request validation failed")
                    .with_details(json!({ "errors": errors }))
            }
            AppError::BadRequest { message } => ErrorResponse::new("BAD_REQUEST", message),
            AppError::UnsupportedOperator { operator } => ErrorResponse::new(
                "UNSUPPORTED_OPERATOR",
                &format!("Unsupported filter operator: {operator}"),
            ),
            AppError::Scheduling { org_id, .. } => ErrorResponse::new(
                "SCHEDULING_ERROR",
                &format!("Scheduling failed for organization {org_id}"),
            ),
            AppError::Database { operation, .. } => ErrorResponse::new(
                "DATABASE_ERROR",
                &format!("Database operation failed: {operation}"),
            ),
            AppError::Configuration { key, .. } => ErrorResponse::new(
                "CONFIGURATION_ERROR",
                &format!("Configuration error: {key}"),
            ),
            AppError::ConnectionPool { .. } => {
                ErrorResponse::new("SERVICE_UNAVAILABLE", "Database connection unavailable")
            }
            AppError::Internal { .. } => {
                ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred")
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Maps an AppError variant to its corresponding HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Duplicate { .. } => StatusCode::CONFLICT,
        AppError::Validation { .. }
        | AppError::ValidationErrors { .. }
        | AppError::BadRequest { .. }
        | AppError::UnsupportedOperator { .. } => StatusCode::BAD_REQUEST,
        AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
        AppError::Scheduling { .. }
        | AppError::Database { .. }
        | AppError::Configuration { .. }
        | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
