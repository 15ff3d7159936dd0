//! Handlers for the `/students` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use academy_core::error::CoreError;
use academy_core::types::DbId;
use academy_db::models::student::{CreateStudent, Student, StudentListQuery, UpdateStudent};
use academy_db::repositories::StudentRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::context::TenantContext;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/students
pub async fn create(
    ctx: TenantContext,
    State(state): State<AppState>,
    Json(input): Json<CreateStudent>,
) -> AppResult<(StatusCode, Json<DataResponse<Student>>)> {
    input.validate()?;
    let student = StudentRepo::create(&state.pool, ctx.tenant_id, &input).await?;
    tracing::info!(
        tenant_id = ctx.tenant_id,
        student_id = student.id,
        "Created student"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: student })))
}

/// GET /api/v1/students
pub async fn list(
    ctx: TenantContext,
    State(state): State<AppState>,
    Query(params): Query<StudentListQuery>,
) -> AppResult<Json<DataResponse<Vec<Student>>>> {
    let students = StudentRepo::list(&state.pool, ctx.tenant_id, &params).await?;
    Ok(Json(DataResponse { data: students }))
}

/// GET /api/v1/students/{id}
pub async fn get_by_id(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Student>>> {
    let student = StudentRepo::find_by_id(&state.pool, ctx.tenant_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Student",
            id,
        }))?;
    Ok(Json(DataResponse { data: student }))
}

/// PUT /api/v1/students/{id}
pub async fn update(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStudent>,
) -> AppResult<Json<DataResponse<Student>>> {
    input.validate()?;
    let student = StudentRepo::update(&state.pool, ctx.tenant_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Student",
            id,
        }))?;
    Ok(Json(DataResponse { data: student }))
}
