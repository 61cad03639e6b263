use regex::Regex;
use std::sync::OnceLock;

/// Utility for parsing PostgreSQL constraint violation messages.
///
/// Extracts structured information from constraint violation messages using
/// regex patterns, with the compiled patterns cached for reuse.
pub struct ConstraintParser;

struct RegexPatterns {
    /// Matches "Key (field)=(value)" in PostgreSQL DETAIL lines
    key_value: Regex,
    /// Matches column names in quotes
    column_name: Regex,
    /// Matches table names in quotes
    table_name: Regex,
}

static REGEX_PATTERNS: OnceLock<RegexPatterns> = OnceLock::new();

/// Tables this application owns, longest names first so that
/// `strategy_settings_organization_id_key` parses the table prefix greedily.
const KNOWN_TABLES: &[&str] = &[
    "work_item_templates",
    "strategy_settings",
    "activity_logs",
    "organizations",
    "work_items",
    "customers",
    "users",
];

impl ConstraintParser {
    fn patterns() -> &'static RegexPatterns {
        REGEX_PATTERNS.get_or_init(|| RegexPatterns {
            key_value: Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").unwrap(),
            column_name: Regex::new(r#"column "([^"]+)""#).unwrap(),
            table_name: Regex::new(r#"table "([^"]+)""#).unwrap(),
        })
    }

    /// Parses a unique constraint violation into (entity, field, value).
    ///
    /// Prefers the constraint name (`users_email_key` → users/email) and
    /// falls back to the `Key (field)=(value)` DETAIL in the message.
    pub fn parse_unique_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        if let Some(constraint) = constraint_name
            && let Some((entity, field)) = Self::parse_constraint_name(constraint)
        {
            if let Some((_, value)) = Self::extract_key_value(message) {
                return Some((entity, field, value));
            }
            return Some((entity, field, "duplicate_value".to_string()));
        }

        if let Some((field, value)) = Self::extract_key_value(message) {
            let entity =
                Self::extract_table(message).unwrap_or_else(|| "resource".to_string());
            return Some((entity, field, value));
        }

        None
    }

    /// Parses a not-null violation into (entity, field).
    pub fn parse_not_null_violation(message: &str) -> Option<(String, String)> {
        let field = Self::patterns()
            .column_name
            .captures(message)?
            .get(1)?
            .as_str()
            .to_string();
        let entity = Self::extract_table(message).unwrap_or_else(|| "resource".to_string());
        Some((entity, field))
    }

    /// Parses a foreign-key violation into (referenced entity, field, value).
    pub fn parse_foreign_key_violation(message: &str) -> Option<(String, String, String)> {
        let (field, value) = Self::extract_key_value(message)?;
        let entity = Self::extract_table(message).unwrap_or_else(|| "resource".to_string());
        Some((entity, field, value))
    }

    /// Splits a constraint name like `users_email_key` or
    /// `strategy_settings_organization_id_key` into (table, column).
    fn parse_constraint_name(constraint: &str) -> Option<(String, String)> {
        let stem = constraint.strip_suffix("_key")?;
        for table in KNOWN_TABLES {
            if let Some(rest) = stem.strip_prefix(table)
                && let Some(column) = rest.strip_prefix('_')
                && !column.is_empty()
            {
                return Some((table.to_string(), column.to_string()));
            }
        }
        None
    }

    fn extract_key_value(message: &str) -> Option<(String, String)> {
        let caps = Self::patterns().key_value.captures(message)?;
        Some((caps.get(1)?.as_str().to_string(), caps.get(2)?.as_str().to_string()))
    }

    fn extract_table(message: &str) -> Option<String> {
        Self::patterns()
            .table_name
            .captures(message)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }
}
