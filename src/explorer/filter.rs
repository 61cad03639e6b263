//! Filter condition compiler.
//!
//! Translates a single wire-format filter clause into a SQL fragment with
//! `?` placeholders plus its typed bind values. Placeholders are renumbered
//! to `$n` when the full query is assembled.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::explorer::registry::{ColumnKind, TableDescriptor};

/// Closed set of supported filter operators.
///
/// Parsing the wire string into this enum is the single runtime branch on
/// operator identity; everything downstream matches exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    IsNull,
    NotNull,
}

impl FilterOperator {
    /// Parses the case-sensitive wire key.
    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "equals" => Ok(FilterOperator::Equals),
            "not_equals" => Ok(FilterOperator::NotEquals),
            "contains" => Ok(FilterOperator::Contains),
            "not_contains" => Ok(FilterOperator::NotContains),
            "starts_with" => Ok(FilterOperator::StartsWith),
            "ends_with" => Ok(FilterOperator::EndsWith),
            "greater_than" => Ok(FilterOperator::GreaterThan),
            "less_than" => Ok(FilterOperator::LessThan),
            "greater_than_or_equal" => Ok(FilterOperator::GreaterThanOrEqual),
            "less_than_or_equal" => Ok(FilterOperator::LessThanOrEqual),
            "is_null" => Ok(FilterOperator::IsNull),
            "not_null" => Ok(FilterOperator::NotNull),
            other => Err(AppError::UnsupportedOperator {
                operator: other.to_string(),
            }),
        }
    }

    /// Whether the operator consumes a right-hand value.
    pub fn requires_value(&self) -> bool {
        !matches!(self, FilterOperator::IsNull | FilterOperator::NotNull)
    }

    fn comparison(&self) -> Option<&'static str> {
        match self {
            FilterOperator::Equals => Some("="),
            FilterOperator::NotEquals => Some("<>"),
            FilterOperator::GreaterThan => Some(">"),
            FilterOperator::LessThan => Some("<"),
            FilterOperator::GreaterThanOrEqual => Some(">="),
            FilterOperator::LessThanOrEqual => Some("<="),
            _ => None,
        }
    }
}

/// One filter clause as received on the wire
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FilterClause {
    /// Column name, optionally dotted for JSON sub-fields
    pub field: String,
    /// Operator key, e.g. "equals" or "greater_than"
    pub operator: String,
    /// Comparison value; ignored by is_null / not_null
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

/// Typed bind value attached to a compiled fragment
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

/// A compiled WHERE fragment with `?` placeholders
#[derive(Debug, Clone, PartialEq)]
pub struct SqlPredicate {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

/// Compiles one clause against a table descriptor.
///
/// Fails on unknown fields, unsupported operators, and missing values; any
/// single failure aborts the whole query, never a partial filter set.
pub fn compile_clause(table: &TableDescriptor, clause: &FilterClause) -> AppResult<SqlPredicate> {
    let operator = FilterOperator::parse(&clause.operator)?;

    let mut segments = clause.field.split('.');
    let root = segments.next().unwrap_or_default();
    let path: Vec<&str> = segments.collect();

    let column = table.column(root).ok_or_else(|| AppError::NotFound {
        entity: "Field".to_string(),
        field: "name".to_string(),
        value: clause.field.clone(),
    })?;

    // Left-hand side and the kind comparisons are typed against.
    // Dotted paths extract JSON sub-fields as text, so every comparison on
    // them is a string comparison. Path segments are bound, never spliced
    // into the SQL text.
    let (lhs, lhs_binds, kind) = if path.is_empty() {
        match column.kind {
            ColumnKind::Enum => (format!("{}::text", root), vec![], ColumnKind::Text),
            ColumnKind::Json => (format!("{}::text", root), vec![], ColumnKind::Text),
            kind => (root.to_string(), vec![], kind),
        }
    } else {
        if column.kind != ColumnKind::Json {
            return Err(AppError::Validation {
                field: clause.field.clone(),
                reason: "dotted paths are only supported on JSON columns".to_string(),
            });
        }
        let (lhs, binds) = json_text_extraction(root, &path);
        (lhs, binds, ColumnKind::Text)
    };

    match operator {
        FilterOperator::IsNull => Ok(SqlPredicate {
            sql: format!("{lhs} IS NULL"),
            binds: lhs_binds,
        }),
        FilterOperator::NotNull => Ok(SqlPredicate {
            sql: format!("{lhs} IS NOT NULL"),
            binds: lhs_binds,
        }),
        FilterOperator::Contains
        | FilterOperator::NotContains
        | FilterOperator::StartsWith
        | FilterOperator::EndsWith => {
            let value = required_value(clause)?;
            let text = value_as_text(&value, &clause.field)?;
            let pattern = match operator {
                FilterOperator::Contains | FilterOperator::NotContains => format!("%{text}%"),
                FilterOperator::StartsWith => format!("{text}%"),
                FilterOperator::EndsWith => format!("%{text}"),
                _ => unreachable!(),
            };
            // LIKE needs a text left-hand side; storage-default case
            // sensitivity is intentional (LIKE, not ILIKE).
            let lhs = if kind == ColumnKind::Text {
                lhs
            } else {
                format!("{lhs}::text")
            };
            let keyword = if operator == FilterOperator::NotContains {
                "NOT LIKE"
            } else {
                "LIKE"
            };
            let mut binds = lhs_binds;
            binds.push(BindValue::Text(pattern));
            Ok(SqlPredicate {
                sql: format!("{lhs} {keyword} ?"),
                binds,
            })
        }
        _ => {
            let cmp = operator.comparison().unwrap_or("=");
            let value = required_value(clause)?;
            let (placeholder, bind) = typed_bind(kind, &value, &clause.field)?;
            let mut binds = lhs_binds;
            binds.push(bind);
            Ok(SqlPredicate {
                sql: format!("{lhs} {cmp} {placeholder}"),
                binds,
            })
        }
    }
}

/// Builds `col->?::text->>?::text` extraction for a dotted path, with each
/// path segment as a text bind. The cast picks the text overload of the
/// arrow operators.
fn json_text_extraction(root: &str, path: &[&str]) -> (String, Vec<BindValue>) {
    let mut sql = root.to_string();
    let mut binds = Vec::with_capacity(path.len());
    for (i, segment) in path.iter().enumerate() {
        let arrow = if i + 1 == path.len() { "->>" } else { "->" };
        sql.push_str(arrow);
        sql.push_str("?::text");
        binds.push(BindValue::Text((*segment).to_string()));
    }
    (sql, binds)
}

fn required_value(clause: &FilterClause) -> AppResult<serde_json::Value> {
    match &clause.value {
        Some(v) if !v.is_null() => Ok(v.clone()),
        _ => Err(AppError::Validation {
            field: clause.field.clone(),
            reason: format!("operator '{}' requires a value", clause.operator),
        }),
    }
}

fn value_as_text(value: &serde_json::Value, field: &str) -> AppResult<String> {
    match value {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        _ => Err(AppError::Validation {
            field: field.to_string(),
            reason: "filter values must be scalar".to_string(),
        }),
    }
}

/// Picks the placeholder (with an explicit cast where the driver cannot
/// infer the type) and the typed bind for a comparison.
fn typed_bind(
    kind: ColumnKind,
    value: &serde_json::Value,
    field: &str,
) -> AppResult<(&'static str, BindValue)> {
    match kind {
        ColumnKind::Text | ColumnKind::Enum | ColumnKind::Json => {
            Ok(("?", BindValue::Text(value_as_text(value, field)?)))
        }
        ColumnKind::Integer | ColumnKind::BigInt => {
            let n = value
                .as_i64()
                .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
                .ok_or_else(|| AppError::Validation {
                    field: field.to_string(),
                    reason: "expected an integer value".to_string(),
                })?;
            Ok(("?", BindValue::Int(n)))
        }
        ColumnKind::Float => {
            let n = value
                .as_f64()
                .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
                .ok_or_else(|| AppError::Validation {
                    field: field.to_string(),
                    reason: "expected a numeric value".to_string(),
                })?;
            Ok(("?", BindValue::Float(n)))
        }
        ColumnKind::Boolean => {
            let b = value
                .as_bool()
                .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
                .ok_or_else(|| AppError::Validation {
                    field: field.to_string(),
                    reason: "expected a boolean value".to_string(),
                })?;
            Ok(("?", BindValue::Bool(b)))
        }
        ColumnKind::Timestamp => Ok((
            "?::timestamp",
            BindValue::Text(value_as_text(value, field)?),
        )),
        ColumnKind::Date => Ok(("?::date", BindValue::Text(value_as_text(value, field)?))),
        ColumnKind::Uuid => Ok(("?::uuid", BindValue::Text(value_as_text(value, field)?))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::registry::TableRegistry;
    use serde_json::json;

    fn table(name: &str) -> &'static TableDescriptor {
        TableRegistry::bundled().resolve(name).unwrap()
    }

    fn clause(field: &str, operator: &str, value: Option<serde_json::Value>) -> FilterClause {
        FilterClause {
            field: field.to_string(),
            operator: operator.to_string(),
            value,
        }
    }

    #[test]
    fn test_parse_all_operator_keys() {
        for key in [
            "equals",
            "not_equals",
            "contains",
            "not_contains",
            "starts_with",
            "ends_with",
            "greater_than",
            "less_than",
            "greater_than_or_equal",
            "less_than_or_equal",
            "is_null",
            "not_null",
        ] {
            assert!(FilterOperator::parse(key).is_ok(), "{key} should parse");
        }
    }

    #[test]
    fn test_parse_unknown_operator() {
        let err = FilterOperator::parse("fuzzy").unwrap_err();
        assert!(matches!(err, AppError::UnsupportedOperator { operator } if operator == "fuzzy"));
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!(FilterOperator::parse("Equals").is_err());
    }

    #[test]
    fn test_equals_on_text_column() {
        let p = compile_clause(
            table("customers"),
            &clause("name", "equals", Some(json!("Acme"))),
        )
        .unwrap();
        assert_eq!(p.sql, "name = ?");
        assert_eq!(p.binds, vec![BindValue::Text("Acme".to_string())]);
    }

    #[test]
    fn test_not_equals_on_integer_column() {
        let p = compile_clause(
            table("work_items"),
            &clause("assignee_id", "not_equals", Some(json!(7))),
        )
        .unwrap();
        assert_eq!(p.sql, "assignee_id <> ?");
        assert_eq!(p.binds, vec![BindValue::Int(7)]);
    }

    #[test]
    fn test_contains_builds_like_pattern() {
        let p = compile_clause(
            table("customers"),
            &clause("email", "contains", Some(json!("@example"))),
        )
        .unwrap();
        assert_eq!(p.sql, "email LIKE ?");
        assert_eq!(p.binds, vec![BindValue::Text("%@example%".to_string())]);
    }

    #[test]
    fn test_not_contains_uses_not_like() {
        let p = compile_clause(
            table("customers"),
            &clause("plan", "not_contains", Some(json!("trial"))),
        )
        .unwrap();
        assert_eq!(p.sql, "plan NOT LIKE ?");
        assert_eq!(p.binds, vec![BindValue::Text("%trial%".to_string())]);
    }

    #[test]
    fn test_starts_with_and_ends_with_patterns() {
        let p = compile_clause(
            table("customers"),
            &clause("name", "starts_with", Some(json!("Ac"))),
        )
        .unwrap();
        assert_eq!(p.binds, vec![BindValue::Text("Ac%".to_string())]);

        let p = compile_clause(
            table("customers"),
            &clause("name", "ends_with", Some(json!("me"))),
        )
        .unwrap();
        assert_eq!(p.binds, vec![BindValue::Text("%me".to_string())]);
    }

    #[test]
    fn test_like_on_non_text_column_casts_lhs() {
        let p = compile_clause(
            table("customers"),
            &clause("id", "contains", Some(json!("42"))),
        )
        .unwrap();
        assert_eq!(p.sql, "id::text LIKE ?");
    }

    #[test]
    fn test_enum_column_compares_as_text() {
        let p = compile_clause(
            table("work_items"),
            &clause("status", "equals", Some(json!("open"))),
        )
        .unwrap();
        assert_eq!(p.sql, "status::text = ?");
        assert_eq!(p.binds, vec![BindValue::Text("open".to_string())]);
    }

    #[test]
    fn test_timestamp_comparison_casts_placeholder() {
        let p = compile_clause(
            table("customers"),
            &clause(
                "created_at",
                "greater_than_or_equal",
                Some(json!("2026-01-01T00:00:00")),
            ),
        )
        .unwrap();
        assert_eq!(p.sql, "created_at >= ?::timestamp");
        assert_eq!(
            p.binds,
            vec![BindValue::Text("2026-01-01T00:00:00".to_string())]
        );
    }

    #[test]
    fn test_boolean_column_bind() {
        let p = compile_clause(
            table("work_item_templates"),
            &clause("enabled", "equals", Some(json!(true))),
        )
        .unwrap();
        assert_eq!(p.sql, "enabled = ?");
        assert_eq!(p.binds, vec![BindValue::Bool(true)]);
    }

    #[test]
    fn test_is_null_ignores_value() {
        let p = compile_clause(
            table("customers"),
            &clause("email", "is_null", Some(json!("ignored"))),
        )
        .unwrap();
        assert_eq!(p.sql, "email IS NULL");
        assert!(p.binds.is_empty());
    }

    #[test]
    fn test_not_null() {
        let p = compile_clause(table("customers"), &clause("plan", "not_null", None)).unwrap();
        assert_eq!(p.sql, "plan IS NOT NULL");
    }

    #[test]
    fn test_missing_value_rejected() {
        let err =
            compile_clause(table("customers"), &clause("name", "equals", None)).unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));

        let err = compile_clause(
            table("customers"),
            &clause("name", "equals", Some(serde_json::Value::Null)),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[test]
    fn test_unknown_field_is_not_found() {
        let err = compile_clause(
            table("customers"),
            &clause("password", "equals", Some(json!("x"))),
        )
        .unwrap_err();
        match err {
            AppError::NotFound { entity, value, .. } => {
                assert_eq!(entity, "Field");
                assert_eq!(value, "password");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_dotted_path_compiles_json_extraction() {
        let p = compile_clause(
            table("customers"),
            &clause("metadata.billing.tier", "equals", Some(json!("gold"))),
        )
        .unwrap();
        assert_eq!(p.sql, "metadata->?::text->>?::text = ?");
        assert_eq!(
            p.binds,
            vec![
                BindValue::Text("billing".to_string()),
                BindValue::Text("tier".to_string()),
                BindValue::Text("gold".to_string()),
            ]
        );
    }

    #[test]
    fn test_dotted_path_single_segment() {
        let p = compile_clause(
            table("customers"),
            &clause("metadata.plan", "equals", Some(json!("pro"))),
        )
        .unwrap();
        assert_eq!(p.sql, "metadata->>?::text = ?");
        assert_eq!(
            p.binds,
            vec![
                BindValue::Text("plan".to_string()),
                BindValue::Text("pro".to_string()),
            ]
        );
    }

    #[test]
    fn test_json_subfield_comparison_stays_textual() {
        // Numeric values against JSON paths compare as strings; the engine
        // does not promote them to numeric ordering.
        let p = compile_clause(
            table("customers"),
            &clause("metadata.seats", "greater_than", Some(json!(10))),
        )
        .unwrap();
        assert_eq!(p.sql, "metadata->>?::text > ?");
        assert_eq!(
            p.binds,
            vec![
                BindValue::Text("seats".to_string()),
                BindValue::Text("10".to_string()),
            ]
        );
    }

    #[test]
    fn test_path_segment_with_question_mark_is_bound() {
        // A '?' inside a JSON key must become a bind, not SQL text, or the
        // placeholder renumbering would swallow it.
        let p = compile_clause(
            table("customers"),
            &clause("metadata.a?b", "equals", Some(json!("x"))),
        )
        .unwrap();
        assert_eq!(p.sql, "metadata->>?::text = ?");
        assert_eq!(
            p.binds,
            vec![
                BindValue::Text("a?b".to_string()),
                BindValue::Text("x".to_string()),
            ]
        );
    }

    #[test]
    fn test_path_segment_with_quote_is_bound() {
        let p = compile_clause(
            table("customers"),
            &clause("metadata.o'brien", "is_null", None),
        )
        .unwrap();
        assert_eq!(p.sql, "metadata->>?::text IS NULL");
        assert_eq!(p.binds, vec![BindValue::Text("o'brien".to_string())]);
    }

    #[test]
    fn test_dotted_path_on_non_json_column_rejected() {
        let err = compile_clause(
            table("customers"),
            &clause("name.first", "equals", Some(json!("a"))),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[test]
    fn test_non_scalar_value_rejected() {
        let err = compile_clause(
            table("customers"),
            &clause("name", "equals", Some(json!(["a", "b"]))),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }
}
