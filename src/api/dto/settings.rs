//! Strategy settings DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::{StrategySettings, UpdateStrategySettings};

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for updating an organization's scheduling strategy.
///
/// All fields are optional; absent fields are left unchanged. An empty
/// `cron_schedule` string clears the stored schedule.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateSettingsRequest {
    pub cron_enabled: Option<bool>,
    #[validate(custom(function = validate_cron_schedule))]
    #[schema(example = "*/15 * * * *")]
    pub cron_schedule: Option<String>,
    pub auto_generate_work_items: Option<bool>,
    #[validate(range(min = 1, max = 90, message = "lookahead_days must be between 1 and 90"))]
    #[schema(minimum = 1, maximum = 90)]
    pub lookahead_days: Option<i32>,
}

impl UpdateSettingsRequest {
    /// Converts the request DTO into a changeset for the settings row.
    pub fn into_update(self) -> UpdateStrategySettings {
        UpdateStrategySettings {
            cron_enabled: self.cron_enabled,
            // Empty string clears the schedule, absent leaves it unchanged.
            cron_schedule: self.cron_schedule.map(|s| {
                if s.is_empty() { None } else { Some(s) }
            }),
            auto_generate_work_items: self.auto_generate_work_items,
            lookahead_days: self.lookahead_days,
        }
    }
}

/// Accepts an empty string (clear) or a 5-field cron expression.
fn validate_cron_schedule(schedule: &str) -> Result<(), ValidationError> {
    if schedule.is_empty() {
        return Ok(());
    }
    if schedule.split_whitespace().count() != 5 {
        return Err(ValidationError::new("cron_schedule")
            .with_message("cron schedule must have exactly 5 fields".into()));
    }
    Ok(())
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Response body for an organization's scheduling strategy.
#[derive(Debug, Serialize, ToSchema)]
pub struct SettingsResponse {
    pub organization_id: i32,
    pub cron_enabled: bool,
    pub cron_schedule: Option<String>,
    pub auto_generate_work_items: bool,
    pub lookahead_days: i32,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub last_cron_execution: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: String,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: String,
}

impl From<StrategySettings> for SettingsResponse {
    fn from(settings: StrategySettings) -> Self {
        Self {
            organization_id: settings.organization_id,
            cron_enabled: settings.cron_enabled,
            cron_schedule: settings.cron_schedule,
            auto_generate_work_items: settings.auto_generate_work_items,
            lookahead_days: settings.lookahead_days,
            last_cron_execution: settings
                .last_cron_execution
                .map(|t| t.to_jiff().to_string()),
            created_at: settings.created_at.to_jiff().to_string(),
            updated_at: settings.updated_at.to_jiff().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_cron_passes() {
        let request = UpdateSettingsRequest {
            cron_enabled: Some(true),
            cron_schedule: Some("*/15 * * * *".to_string()),
            auto_generate_work_items: None,
            lookahead_days: Some(30),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_malformed_cron_rejected() {
        let request = UpdateSettingsRequest {
            cron_enabled: None,
            cron_schedule: Some("*/15 * *".to_string()),
            auto_generate_work_items: None,
            lookahead_days: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_lookahead_out_of_range_rejected() {
        let request = UpdateSettingsRequest {
            cron_enabled: None,
            cron_schedule: None,
            auto_generate_work_items: None,
            lookahead_days: Some(365),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_empty_cron_clears_schedule() {
        let request = UpdateSettingsRequest {
            cron_enabled: None,
            cron_schedule: Some(String::new()),
            auto_generate_work_items: None,
            lookahead_days: None,
        };
        assert!(request.validate().is_ok());

        let update = request.into_update();
        assert_eq!(update.cron_schedule, Some(None));
    }

    #[test]
    fn test_absent_cron_leaves_schedule_unchanged() {
        let request = UpdateSettingsRequest {
            cron_enabled: Some(false),
            cron_schedule: None,
            auto_generate_work_items: None,
            lookahead_days: None,
        };

        let update = request.into_update();
        assert_eq!(update.cron_schedule, None);
        assert_eq!(update.cron_enabled, Some(false));
    }
}
