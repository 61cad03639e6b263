//! Whitelist of tables exposed to the dynamic query engine.
//!
//! The registry is populated once at process start and immutable afterwards.
//! Only tables listed here can be queried through the explorer API, and each
//! carries the column metadata the filter compiler needs for typing.

use crate::error::{AppError, AppResult};

/// Column type classification used to pick bind types and casts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    BigInt,
    Float,
    Boolean,
    Timestamp,
    Date,
    Json,
    Uuid,
    /// Postgres enum column, compared through a ::text cast
    Enum,
}

impl ColumnKind {
    /// Name reported on the fields endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Text => "text",
            ColumnKind::Integer => "integer",
            ColumnKind::BigInt => "bigint",
            ColumnKind::Float => "float",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Timestamp => "timestamp",
            ColumnKind::Date => "date",
            ColumnKind::Json => "json",
            ColumnKind::Uuid => "uuid",
            ColumnKind::Enum => "enum",
        }
    }
}

/// A single queryable column
#[derive(Debug, Clone, Copy)]
pub struct ColumnDescriptor {
    pub name: &'static str,
    pub kind: ColumnKind,
}

/// A registered table and its tenant-isolation column
#[derive(Debug, Clone, Copy)]
pub struct TableDescriptor {
    /// Name used on the wire
    pub name: &'static str,
    /// Actual relation name in SQL
    pub sql_name: &'static str,
    /// Column enforcing tenant isolation; None means the table is global
    pub org_column: Option<&'static str>,
    pub columns: &'static [ColumnDescriptor],
}

impl TableDescriptor {
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }
}

const fn col(name: &'static str, kind: ColumnKind) -> ColumnDescriptor {
    ColumnDescriptor { name, kind }
}

const CUSTOMERS: &[ColumnDescriptor] = &[
    col("id", ColumnKind::Integer),
    col("organization_id", ColumnKind::Integer),
    col("name", ColumnKind::Text),
    col("email", ColumnKind::Text),
    col("plan", ColumnKind::Text),
    col("metadata", ColumnKind::Json),
    col("created_at", ColumnKind::Timestamp),
    col("updated_at", ColumnKind::Timestamp),
];

const WORK_ITEMS: &[ColumnDescriptor] = &[
    col("id", ColumnKind::Integer),
    col("organization_id", ColumnKind::Integer),
    col("template_id", ColumnKind::Integer),
    col("title", ColumnKind::Text),
    col("status", ColumnKind::Enum),
    col("assignee_id", ColumnKind::Integer),
    col("scheduled_for", ColumnKind::Timestamp),
    col("metadata", ColumnKind::Json),
    col("created_at", ColumnKind::Timestamp),
    col("updated_at", ColumnKind::Timestamp),
];

const WORK_ITEM_TEMPLATES: &[ColumnDescriptor] = &[
    col("id", ColumnKind::Integer),
    col("organization_id", ColumnKind::Integer),
    col("title", ColumnKind::Text),
    col("cadence_days", ColumnKind::Integer),
    col("next_run_on", ColumnKind::Timestamp),
    col("enabled", ColumnKind::Boolean),
    col("created_at", ColumnKind::Timestamp),
    col("updated_at", ColumnKind::Timestamp),
];

const ACTIVITY_LOGS: &[ColumnDescriptor] = &[
    col("id", ColumnKind::BigInt),
    col("organization_id", ColumnKind::Integer),
    col("user_id", ColumnKind::Integer),
    col("action", ColumnKind::Text),
    col("detail", ColumnKind::Text),
    col("created_at", ColumnKind::Timestamp),
];

const USERS: &[ColumnDescriptor] = &[
    col("id", ColumnKind::Integer),
    col("organization_id", ColumnKind::Integer),
    col("username", ColumnKind::Text),
    col("email", ColumnKind::Text),
    col("role", ColumnKind::Enum),
    col("created_at", ColumnKind::Timestamp),
    col("updated_at", ColumnKind::Timestamp),
];

const TABLES: &[TableDescriptor] = &[
    TableDescriptor {
        name: "customers",
        sql_name: "customers",
        org_column: Some("organization_id"),
        columns: CUSTOMERS,
    },
    TableDescriptor {
        name: "work_items",
        sql_name: "work_items",
        org_column: Some("organization_id"),
        columns: WORK_ITEMS,
    },
    TableDescriptor {
        name: "work_item_templates",
        sql_name: "work_item_templates",
        org_column: Some("organization_id"),
        columns: WORK_ITEM_TEMPLATES,
    },
    TableDescriptor {
        name: "activity_logs",
        sql_name: "activity_logs",
        org_column: Some("organization_id"),
        columns: ACTIVITY_LOGS,
    },
    TableDescriptor {
        name: "users",
        sql_name: "users",
        org_column: Some("organization_id"),
        columns: USERS,
    },
];

/// Static whitelist of queryable tables
#[derive(Debug, Clone, Copy)]
pub struct TableRegistry {
    tables: &'static [TableDescriptor],
}

impl TableRegistry {
    /// Registry with all tables this build exposes
    pub fn bundled() -> Self {
        Self { tables: TABLES }
    }

    pub fn tables(&self) -> &'static [TableDescriptor] {
        self.tables
    }

    /// Resolves a wire name to its descriptor.
    ///
    /// Unknown names are a lookup failure, never an authorization failure.
    pub fn resolve(&self, name: &str) -> AppResult<&'static TableDescriptor> {
        self.tables
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| AppError::NotFound {
                entity: "Table".to_string(),
                field: "name".to_string(),
                value: name.to_string(),
            })
    }
}
