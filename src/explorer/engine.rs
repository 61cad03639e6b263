//! Dynamic count-query engine.
//!
//! Assembles a bounded `SELECT COUNT(*)` over a registered table from a list
//! of compiled filter clauses. SQL assembly is a pure function so the
//! composition rules are unit-testable without a database; execution goes
//! through `diesel::sql_query` with chained binds.

use std::time::Instant;

use diesel::pg::Pg;
use diesel::sql_types::{BigInt, Bool, Double, Text};
use diesel_async::RunQueryDsl;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::explorer::filter::{BindValue, FilterClause, compile_clause};
use crate::explorer::registry::TableDescriptor;

/// Upper bound on rows scanned when the caller does not supply one
pub const DEFAULT_ROW_SCAN_LIMIT: i64 = 1000;

/// Caller-supplied query configuration
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct QueryConfig {
    #[serde(default)]
    pub filters: Vec<FilterClause>,
    /// Row scan bound; defaults to 1000
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Fully assembled SQL with positional binds in `$n` order
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

/// Result of one count invocation
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub count: i64,
    pub duration_ms: u64,
    /// Caller-supplied clauses only; the tenant predicate is not counted
    pub filter_count: usize,
}

#[derive(diesel::QueryableByName)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

/// Builds the bounded count query for a table.
///
/// The tenant-isolation predicate is always the first conjunct; caller
/// filters are AND-composed after it and can never replace it. Any clause
/// that fails to compile aborts the whole query.
pub fn build_count_query(
    table: &TableDescriptor,
    org_id: i32,
    config: &QueryConfig,
) -> AppResult<CompiledQuery> {
    let mut conjuncts: Vec<String> = Vec::with_capacity(config.filters.len() + 1);
    let mut binds: Vec<BindValue> = Vec::with_capacity(config.filters.len() + 2);

    if let Some(org_column) = table.org_column {
        conjuncts.push(format!("{org_column} = ?"));
        binds.push(BindValue::Int(i64::from(org_id)));
    }

    for clause in &config.filters {
        let predicate = compile_clause(table, clause)?;
        conjuncts.push(predicate.sql);
        binds.extend(predicate.binds);
    }

    let limit = config.limit.unwrap_or(DEFAULT_ROW_SCAN_LIMIT);
    if limit < 1 {
        return Err(AppError::Validation {
            field: "limit".to_string(),
            reason: "limit must be at least 1".to_string(),
        });
    }

    let inner = if conjuncts.is_empty() {
        format!("SELECT 1 FROM {} LIMIT ?", table.sql_name)
    } else {
        format!(
            "SELECT 1 FROM {} WHERE {} LIMIT ?",
            table.sql_name,
            conjuncts.join(" AND ")
        )
    };
    binds.push(BindValue::Int(limit));

    let sql = number_placeholders(&format!(
        "SELECT COUNT(*) AS count FROM ({inner}) AS bounded"
    ));

    Ok(CompiledQuery { sql, binds })
}

/// Rewrites `?` placeholders as `$1`, `$2`, ... for the Postgres wire
/// protocol. Safe because compiled fragments never embed user text.
fn number_placeholders(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut n = 0;
    for ch in sql.chars() {
        if ch == '?' {
            n += 1;
            out.push('$');
            out.push_str(&n.to_string());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Executes count queries against the live database
#[derive(Clone)]
pub struct QueryEngine {
    pool: AsyncDbPool,
}

impl QueryEngine {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Runs one bounded count for the organization. Read-only, a single
    /// query per invocation, no retry.
    pub async fn count(
        &self,
        table: &TableDescriptor,
        org_id: i32,
        config: &QueryConfig,
    ) -> AppResult<QueryOutcome> {
        let compiled = build_count_query(table, org_id, config)?;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AppError::ConnectionPool {
                source: anyhow::Error::from(e),
            })?;

        let started = Instant::now();

        let mut query = diesel::sql_query(compiled.sql).into_boxed::<Pg>();
        for bind in compiled.binds {
            query = match bind {
                BindValue::Text(v) => query.bind::<Text, _>(v),
                BindValue::Int(v) => query.bind::<BigInt, _>(v),
                BindValue::Float(v) => query.bind::<Double, _>(v),
                BindValue::Bool(v) => query.bind::<Bool, _>(v),
            };
        }

        let row: CountRow =
            query
                .get_result(&mut conn)
                .await
                .map_err(|e| AppError::Database {
                    operation: format!("count query on {}", table.sql_name),
                    source: anyhow::Error::from(e),
                })?;

        Ok(QueryOutcome {
            count: row.count,
            duration_ms: started.elapsed().as_millis() as u64,
            filter_count: config.filters.len(),
        })
    }
}
