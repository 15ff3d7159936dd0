//! Database access layer: pool construction, migrations, models, and
//! repositories.
//!
//! Repositories are zero-sized structs with async methods over `&PgPool`.
//! Every query on tenant-owned data is scoped by `tenant_id`; nothing in
//! this crate infers a tenant from ambient state.

pub mod models;
pub mod repositories;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Shared connection pool alias used across the workspace.
pub type DbPool = PgPool;

/// Build a Postgres connection pool.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    tracing::info!(max_connections, "Connecting to database");
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Cheap connectivity probe used by the health endpoint.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    tracing::info!("Running database migrations");
    sqlx::migrate!("../../db/migrations").run(pool).await?;
    tracing::info!("Migrations up to date");
    Ok(())
}
