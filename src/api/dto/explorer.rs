//! Explorer DTOs for the dynamic query API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::explorer::{ColumnDescriptor, QueryConfig, QueryOutcome, TableDescriptor};

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for a dynamic count query.
#[derive(Debug, Deserialize, ToSchema)]
pub struct QueryRequest {
    /// Registered table to query
    #[schema(example = "customers")]
    pub source_table: String,
    /// Filters and scan bound; an absent config counts everything up to
    /// the default limit
    #[serde(default)]
    pub query_config: QueryConfig,
}

impl QueryRequest {
    pub fn into_config(self) -> (String, QueryConfig) {
        (self.source_table, self.query_config)
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Response body for a count query.
#[derive(Debug, Serialize, ToSchema)]
pub struct QueryResponse {
    pub count: i64,
    /// Query execution time in milliseconds
    pub duration: u64,
    pub source_table: String,
    /// Number of caller-supplied filters applied
    pub filter_count: usize,
}

impl QueryResponse {
    pub fn from_outcome(table: &str, outcome: QueryOutcome) -> Self {
        Self {
            count: outcome.count,
            duration: outcome.duration_ms,
            source_table: table.to_string(),
            filter_count: outcome.filter_count,
        }
    }
}

/// One entry on the table listing endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct TableResponse {
    pub name: String,
    pub field_count: usize,
}

impl From<&TableDescriptor> for TableResponse {
    fn from(table: &TableDescriptor) -> Self {
        Self {
            name: table.name.to_string(),
            field_count: table.columns.len(),
        }
    }
}

/// One queryable field of a registered table.
#[derive(Debug, Serialize, ToSchema)]
pub struct FieldResponse {
    pub name: String,
    #[schema(example = "text")]
    pub kind: String,
}

impl From<&ColumnDescriptor> for FieldResponse {
    fn from(column: &ColumnDescriptor) -> Self {
        Self {
            name: column.name.to_string(),
            kind: column.kind.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_request_defaults() {
        let request: QueryRequest = serde_json::from_value(json!({
            "source_table": "customers"
        }))
        .unwrap();

        assert_eq!(request.source_table, "customers");
        assert!(request.query_config.filters.is_empty());
        assert_eq!(request.query_config.limit, None);
    }

    #[test]
    fn test_query_request_with_filters() {
        let request: QueryRequest = serde_json::from_value(json!({
            "source_table": "work_items",
            "query_config": {
                "filters": [
                    {"field": "status", "operator": "equals", "value": "open"}
                ],
                "limit": 500
            }
        }))
        .unwrap();

        let (table, config) = request.into_config();
        assert_eq!(table, "work_items");
        assert_eq!(config.filters.len(), 1);
        assert_eq!(config.limit, Some(500));
    }

    #[test]
    fn test_query_response_shape() {
        let response = QueryResponse::from_outcome(
            "customers",
            QueryOutcome {
                count: 12,
                duration_ms: 3,
                filter_count: 2,
            },
        );
        let body = serde_json::to_value(&response).unwrap();

        assert_eq!(
            body,
            json!({
                "count": 12,
                "duration": 3,
                "source_table": "customers",
                "filter_count": 2
            })
        );
    }
}
