use crate::error::{AppError, ConstraintParser};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// Converts diesel errors into structured [`AppError`] values.
///
/// Constraint violations are parsed into entity/field/value triples so the
/// API layer can return actionable messages instead of raw driver output.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    /// Converts a diesel error, tagging it with the operation that failed.
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::NotFound => AppError::NotFound {
                entity: "record".to_string(),
                field: "query".to_string(),
                value: operation.to_string(),
            },
            DieselError::DatabaseError(kind, info) => {
                let message = info.message().to_string();
                let constraint = info.constraint_name().map(|c| c.to_string());
                Self::convert_database_error(kind, &message, constraint.as_deref(), operation)
            }
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        message: &str,
        constraint: Option<&str>,
        operation: &str,
    ) -> AppError {
        match kind {
            DatabaseErrorKind::UniqueViolation => {
                if let Some((entity, field, value)) =
                    ConstraintParser::parse_unique_violation(message, constraint)
                {
                    AppError::Duplicate {
                        entity,
                        field,
                        value,
                    }
                } else {
                    AppError::Duplicate {
                        entity: "resource".to_string(),
                        field: "unknown".to_string(),
                        value: "duplicate_value".to_string(),
                    }
                }
            }
            DatabaseErrorKind::NotNullViolation => {
                if let Some((_, field)) = ConstraintParser::parse_not_null_violation(message) {
                    AppError::Validation {
                        field,
                        reason: "value is required".to_string(),
                    }
                } else {
                    AppError::Validation {
                        field: "unknown".to_string(),
                        reason: "required value was null".to_string(),
                    }
                }
            }
            DatabaseErrorKind::ForeignKeyViolation => {
                if let Some((entity, field, value)) =
                    ConstraintParser::parse_foreign_key_violation(message)
                {
                    AppError::NotFound {
                        entity,
                        field,
                        value,
                    }
                } else {
                    AppError::Validation {
                        field: "reference".to_string(),
                        reason: "referenced record does not exist".to_string(),
                    }
                }
            }
            _ => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::anyhow!("{message}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_not_found() {
        let err = DatabaseErrorConverter::convert_diesel_error(
            DieselError::NotFound,
            "find settings by organization",
        );
        match err {
            AppError::NotFound { entity, .. } => assert_eq!(entity, "record"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_unique_violation_without_parseable_detail() {
        let err = DatabaseErrorConverter::convert_database_error(
            DatabaseErrorKind::UniqueViolation,
            "duplicate key value",
            None,
            "insert user",
        );
        match err {
            AppError::Duplicate { field, value, .. } => {
                assert_eq!(field, "unknown");
                assert_eq!(value, "duplicate_value");
            }
            other => panic!("expected Duplicate, got {other:?}"),
        }
    }

    #[test]
    fn test_not_null_violation_maps_to_validation() {
        let err = DatabaseErrorConverter::convert_database_error(
            DatabaseErrorKind::NotNullViolation,
            "null value in column \"title\" violates not-null constraint",
            None,
            "insert work item",
        );
        match err {
            AppError::Validation { field, .. } => assert_eq!(field, "title"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_foreign_key_violation_maps_to_not_found() {
        let err = DatabaseErrorConverter::convert_database_error(
            DatabaseErrorKind::ForeignKeyViolation,
            "insert or update on table \"work_items\" violates foreign key constraint\nDETAIL: Key (template_id)=(9) is not present in table \"work_item_templates\".",
            None,
            "insert work item",
        );
        match err {
            AppError::NotFound { field, value, .. } => {
                assert_eq!(field, "template_id");
                assert_eq!(value, "9");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}
