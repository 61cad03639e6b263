//! Explorer service for dynamic count queries.
//!
//! Coordinates the table registry and the query engine: callers name a
//! table, the registry decides whether it is queryable at all, and the
//! engine runs the tenant-scoped count.

use crate::error::AppResult;
use crate::explorer::{QueryConfig, QueryEngine, QueryOutcome, TableDescriptor, TableRegistry};

/// Service wrapping the bundled registry and the count engine.
///
/// Cloning is cheap; the registry is static and the engine holds an `Arc`
/// pool internally.
#[derive(Clone)]
pub struct ExplorerService {
    registry: TableRegistry,
    engine: QueryEngine,
}

impl ExplorerService {
    pub fn new(engine: QueryEngine) -> Self {
        Self {
            registry: TableRegistry::bundled(),
            engine,
        }
    }

    /// Lists every queryable table.
    pub fn tables(&self) -> &'static [TableDescriptor] {
        self.registry.tables()
    }

    /// Resolves a table by its exposed name, or `NotFound`.
    pub fn table(&self, name: &str) -> AppResult<&'static TableDescriptor> {
        self.registry.resolve(name)
    }

    /// Runs a tenant-scoped count against a registered table.
    pub async fn count(
        &self,
        org_id: i32,
        table_name: &str,
        config: &QueryConfig,
    ) -> AppResult<QueryOutcome> {
        let table = self.registry.resolve(table_name)?;
        self.engine.count(table, org_id, config).await
    }
}
