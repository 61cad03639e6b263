//! Scheduler DTOs for manual runs and status inspection.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::scheduler::GenerationOutcome;

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for triggering a generation run.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct TriggerRunRequest {
    /// Window override for this run only; defaults to the stored setting
    #[validate(range(min = 1, max = 90, message = "lookahead_days must be between 1 and 90"))]
    #[schema(minimum = 1, maximum = 90)]
    pub lookahead_days: Option<i32>,
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Response body for a completed generation run.
#[derive(Debug, Serialize, ToSchema)]
pub struct TriggerRunResponse {
    /// Number of work items created
    pub created: usize,
}

impl From<GenerationOutcome> for TriggerRunResponse {
    fn from(outcome: GenerationOutcome) -> Self {
        Self {
            created: outcome.created,
        }
    }
}

/// Response body for scheduler status.
#[derive(Debug, Serialize, ToSchema)]
pub struct SchedulerStatusResponse {
    /// Whether the requesting organization has a timer installed
    pub scheduled: bool,
    /// Total timers currently installed across all organizations
    pub active_timers: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trigger_run_request_validation() {
        let ok = TriggerRunRequest {
            lookahead_days: Some(30),
        };
        assert!(ok.validate().is_ok());

        let too_far = TriggerRunRequest {
            lookahead_days: Some(180),
        };
        assert!(too_far.validate().is_err());

        let default = TriggerRunRequest::default();
        assert!(default.validate().is_ok());
    }

    #[test]
    fn test_status_response_shape() {
        let response = SchedulerStatusResponse {
            scheduled: true,
            active_timers: 3,
        };
        let body = serde_json::to_value(&response).unwrap();

        assert_eq!(body, json!({"scheduled": true, "active_timers": 3}));
    }
}
