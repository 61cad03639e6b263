//! Data transfer objects for API requests and responses.

mod error;
mod explorer;
mod health;
mod scheduler;
mod settings;

pub use error::ErrorResponse;
pub use explorer::{FieldResponse, QueryRequest, QueryResponse, TableResponse};
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use scheduler::{SchedulerStatusResponse, TriggerRunRequest, TriggerRunResponse};
pub use settings::{SettingsResponse, UpdateSettingsRequest};
