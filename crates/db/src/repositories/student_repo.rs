//! Repository for the `students` table.

use academy_core::types::DbId;
use sqlx::PgPool;

use crate::models::student::{CreateStudent, Student, StudentListQuery, UpdateStudent};

/// Column list for `students` queries.
const COLUMNS: &str =
    "id, tenant_id, name, email, subscription_active, created_at, updated_at";

/// Maximum page size for student listing.
const MAX_LIMIT: i64 = 200;

/// Default page size for student listing.
const DEFAULT_LIMIT: i64 = 50;

/// Provides CRUD operations for students.
pub struct StudentRepo;

impl StudentRepo {
    /// Create a student within a tenant.
    pub async fn create(
        pool: &PgPool,
        tenant_id: DbId,
        input: &CreateStudent,
    ) -> Result<Student, sqlx::Error> {
        let query = format!(
            "INSERT INTO students (tenant_id, name, email, subscription_active) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Student>(&query)
            .bind(tenant_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(input.subscription_active.unwrap_or(true))
            .fetch_one(pool)
            .await
    }

    /// Find a student by ID within a tenant.
    pub async fn find_by_id(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<Student>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM students WHERE tenant_id = $1 AND id = $2");
        sqlx::query_as::<_, Student>(&query)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Patch a student. Absent fields keep their current value.
    pub async fn update(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
        input: &UpdateStudent,
    ) -> Result<Option<Student>, sqlx::Error> {
        let query = format!(
            "UPDATE students SET \
                 name = COALESCE($3, name), \
                 email = COALESCE($4, email), \
                 subscription_active = COALESCE($5, subscription_active) \
             WHERE tenant_id = $1 AND id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Student>(&query)
            .bind(tenant_id)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(input.subscription_active)
            .fetch_optional(pool)
            .await
    }

    /// List a tenant's students with optional subscription filter and
    /// pagination.
    pub async fn list(
        pool: &PgPool,
        tenant_id: DbId,
        params: &StudentListQuery,
    ) -> Result<Vec<Student>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = params.offset.unwrap_or(0).max(0);

        // Build the WHERE clause and track the next bind parameter index.
        let mut conditions = vec!["tenant_id = $1".to_string()];
        let mut bind_idx: u32 = 2;

        if params.subscription_active.is_some() {
            conditions.push(format!("subscription_active = ${bind_idx}"));
            bind_idx += 1;
        }

        let query = format!(
            "SELECT {COLUMNS} FROM students \
             WHERE {} \
             ORDER BY name, id \
             LIMIT ${bind_idx} OFFSET ${}",
            conditions.join(" AND "),
            bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, Student>(&query).bind(tenant_id);
        if let Some(active) = params.subscription_active {
            q = q.bind(active);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }
}
