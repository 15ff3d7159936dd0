//! Student models and DTOs.

use academy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `students` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Student {
    pub id: DbId,
    pub tenant_id: DbId,
    pub name: String,
    pub email: Option<String>,
    /// Externally resolved subscription fact, stored as a consumed flag.
    /// Billing itself lives outside this system.
    pub subscription_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `POST /api/v1/students`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStudent {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    /// Defaults to true when omitted.
    pub subscription_active: Option<bool>,
}

/// DTO for `PUT /api/v1/students/{id}`. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateStudent {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub subscription_active: Option<bool>,
}

/// Query parameters for `GET /api/v1/students`.
#[derive(Debug, Default, Deserialize)]
pub struct StudentListQuery {
    /// Filter by subscription state when present.
    pub subscription_active: Option<bool>,
    /// Maximum number of results. Defaults to 50, capped at 200.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}
