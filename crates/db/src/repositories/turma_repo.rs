//! Repository for the `turmas` table.

use academy_core::types::DbId;
use sqlx::PgPool;

use crate::models::turma::{CreateTurma, Turma, TurmaListQuery, UpdateTurma};

/// Column list for `turmas` queries.
const COLUMNS: &str =
    "id, tenant_id, name, instructor_id, archived, created_at, updated_at";

/// Maximum page size for turma listing.
const MAX_LIMIT: i64 = 200;

/// Default page size for turma listing.
const DEFAULT_LIMIT: i64 = 50;

/// Provides CRUD operations for turmas.
pub struct TurmaRepo;

impl TurmaRepo {
    /// Create a turma within a tenant.
    pub async fn create(
        pool: &PgPool,
        tenant_id: DbId,
        input: &CreateTurma,
    ) -> Result<Turma, sqlx::Error> {
        let query = format!(
            "INSERT INTO turmas (tenant_id, name, instructor_id) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Turma>(&query)
            .bind(tenant_id)
            .bind(&input.name)
            .bind(input.instructor_id)
            .fetch_one(pool)
            .await
    }

    /// Find a turma by ID within a tenant.
    pub async fn find_by_id(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<Turma>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM turmas WHERE tenant_id = $1 AND id = $2");
        sqlx::query_as::<_, Turma>(&query)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Patch a turma. Absent fields keep their current value.
    pub async fn update(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
        input: &UpdateTurma,
    ) -> Result<Option<Turma>, sqlx::Error> {
        let query = format!(
            "UPDATE turmas SET \
                 name = COALESCE($3, name), \
                 instructor_id = COALESCE($4, instructor_id), \
                 archived = COALESCE($5, archived) \
             WHERE tenant_id = $1 AND id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Turma>(&query)
            .bind(tenant_id)
            .bind(id)
            .bind(&input.name)
            .bind(input.instructor_id)
            .bind(input.archived)
            .fetch_optional(pool)
            .await
    }

    /// List a tenant's turmas, active first by default.
    pub async fn list(
        pool: &PgPool,
        tenant_id: DbId,
        params: &TurmaListQuery,
    ) -> Result<Vec<Turma>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = params.offset.unwrap_or(0).max(0);
        let include_archived = params.include_archived.unwrap_or(false);

        let archived_clause = if include_archived {
            ""
        } else {
            "AND archived = FALSE"
        };

        let query = format!(
            "SELECT {COLUMNS} FROM turmas \
             WHERE tenant_id = $1 {archived_clause} \
             ORDER BY name, id \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Turma>(&query)
            .bind(tenant_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Turmas eligible for horizon generation: not archived and holding a
    /// current schedule definition.
    pub async fn list_generation_candidates(
        pool: &PgPool,
        tenant_id: DbId,
    ) -> Result<Vec<Turma>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM turmas \
             WHERE tenant_id = $1 \
               AND archived = FALSE \
               AND EXISTS ( \
                   SELECT 1 FROM schedule_definitions sd \
                   WHERE sd.turma_id = turmas.id AND sd.replaced_at IS NULL \
               ) \
             ORDER BY id"
        );
        sqlx::query_as::<_, Turma>(&query)
            .bind(tenant_id)
            .fetch_all(pool)
            .await
    }
}
