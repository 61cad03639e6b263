//! Database connection pool module.
//!
//! Provides async PostgreSQL connection pooling using diesel_async with bb8.

mod pool;

pub use pool::{
    AsyncDbConnection, AsyncDbPool, MIGRATIONS, establish_async_connection_pool, get_conn,
    run_pending_migrations,
};
