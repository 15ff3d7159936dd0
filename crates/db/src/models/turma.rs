//! Turma (class group) models and DTOs.

use academy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `turmas` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Turma {
    pub id: DbId,
    pub tenant_id: DbId,
    pub name: String,
    /// Principal id issued by the external identity provider. Not a local
    /// foreign key; instructors have no row in this system.
    pub instructor_id: DbId,
    /// Archived turmas keep their history but are excluded from horizon
    /// generation.
    pub archived: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `POST /api/v1/turmas`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTurma {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub instructor_id: DbId,
}

/// DTO for `PUT /api/v1/turmas/{id}`. Absent fields are left unchanged.
///
/// Changing `instructor_id` affects lessons generated afterwards; already
/// generated lessons keep the instructor they were created with.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTurma {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub instructor_id: Option<DbId>,
    pub archived: Option<bool>,
}

/// Query parameters for `GET /api/v1/turmas`.
#[derive(Debug, Default, Deserialize)]
pub struct TurmaListQuery {
    /// Include archived turmas. Defaults to false.
    pub include_archived: Option<bool>,
    /// Maximum number of results. Defaults to 50, capped at 200.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}
