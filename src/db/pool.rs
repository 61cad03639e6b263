//! Async database connection pool implementation.
//!
//! Uses bb8 connection pool manager with diesel_async for PostgreSQL connections.

use std::time::Duration;

use diesel::{Connection, PgConnection};
use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};

/// Embedded migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Async connection pool type alias.
///
/// bb8::Pool internally uses Arc, so Clone is cheap (just reference count increment).
/// Structures holding AsyncDbPool can derive Clone without additional Arc wrapping.
pub type AsyncDbPool = Pool<AsyncPgConnection>;

/// Pooled connection type alias.
pub type AsyncDbConnection<'a> = PooledConnection<'a, AsyncPgConnection>;

/// Creates an async database connection pool from the database configuration.
///
/// # Errors
///
/// Returns `AppError::ConnectionPool` if the pool cannot be built.
pub async fn establish_async_connection_pool(config: &DatabaseConfig) -> AppResult<AsyncDbPool> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.url.clone());
    let pool = Pool::builder()
        .max_size(config.max_connections)
        .min_idle(Some(config.min_connections))
        .connection_timeout(Duration::from_secs(config.connection_timeout))
        .build(manager)
        .await
        .map_err(|e| AppError::ConnectionPool {
            source: anyhow::Error::from(e),
        })?;
    Ok(pool)
}

/// Checks out a connection from the pool.
pub async fn get_conn(pool: &AsyncDbPool) -> AppResult<AsyncDbConnection<'_>> {
    pool.get().await.map_err(|e| AppError::ConnectionPool {
        source: anyhow::anyhow!(e.to_string()),
    })
}

/// Runs all pending embedded migrations.
///
/// Migrations run on a dedicated blocking connection since the migration
/// harness is synchronous.
pub async fn run_pending_migrations(database_url: &str) -> AppResult<()> {
    let database_url = database_url.to_string();
    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&database_url).map_err(|e| AppError::Database {
            operation: "establish migration connection".to_string(),
            source: anyhow::Error::from(e),
        })?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| AppError::Database {
                operation: "run pending migrations".to_string(),
                source: anyhow::anyhow!(e.to_string()),
            })?;
        Ok::<(), AppError>(())
    })
    .await
    .map_err(|e| AppError::Internal {
        source: anyhow::Error::from(e),
    })?
}
