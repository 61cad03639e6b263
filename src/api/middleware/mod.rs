//! Middleware components for request processing.
//!
//! This module contains middleware for logging, request ID tracking,
//! error handling, and tenant context extraction.

mod error_handler;
mod logging;
mod org_context;
mod request_id;

pub use error_handler::error_to_status_code;
pub use logging::logging_middleware;
pub use org_context::{ORGANIZATION_ID_HEADER, OrgContext};
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
