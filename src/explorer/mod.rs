//! Dynamic filter and query engine over a whitelisted table registry.

pub mod engine;
pub mod filter;
pub mod registry;

pub use engine::{DEFAULT_ROW_SCAN_LIMIT, QueryConfig, QueryEngine, QueryOutcome, build_count_query};
pub use filter::{BindValue, FilterClause, FilterOperator, SqlPredicate, compile_clause};
pub use registry::{ColumnDescriptor, ColumnKind, TableDescriptor, TableRegistry};
