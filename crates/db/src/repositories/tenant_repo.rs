//! Repository for the `tenants` table.

use academy_core::types::DbId;
use sqlx::PgPool;

use crate::models::tenant::Tenant;

/// Column list for `tenants` queries.
const COLUMNS: &str = "id, name, timezone, created_at, updated_at";

/// Provides CRUD operations for tenants.
pub struct TenantRepo;

impl TenantRepo {
    /// Create a tenant. `timezone` must already be validated as an IANA
    /// zone name.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        timezone: &str,
    ) -> Result<Tenant, sqlx::Error> {
        let query = format!(
            "INSERT INTO tenants (name, timezone) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tenant>(&query)
            .bind(name)
            .bind(timezone)
            .fetch_one(pool)
            .await
    }

    /// Find a tenant by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tenant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tenants WHERE id = $1");
        sqlx::query_as::<_, Tenant>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all tenants, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Tenant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tenants ORDER BY id");
        sqlx::query_as::<_, Tenant>(&query).fetch_all(pool).await
    }
}
