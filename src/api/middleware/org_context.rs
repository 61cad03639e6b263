//! Tenant context extraction.
//!
//! Every tenant-scoped endpoint resolves its organization from the
//! X-Organization-Id header. The value never comes from the request body,
//! so caller-supplied filters cannot widen the scope.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;

/// Header carrying the acting organization's id.
pub const ORGANIZATION_ID_HEADER: &str = "x-organization-id";

/// Extractor for the acting organization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrgContext(pub i32);

impl<S> FromRequestParts<S> for OrgContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(ORGANIZATION_ID_HEADER)
            .ok_or_else(|| AppError::BadRequest {
                message: format!("missing {ORGANIZATION_ID_HEADER} header"),
            })?;

        let org_id = header
            .to_str()
            .ok()
            .and_then(|v| v.parse::<i32>().ok())
            .ok_or_else(|| AppError::BadRequest {
                message: format!("{ORGANIZATION_ID_HEADER} header must be an integer"),
            })?;

        Ok(OrgContext(org_id))
    }
}
