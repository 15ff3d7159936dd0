//! Handlers for attendance check-in and per-lesson attendance listing.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use academy_core::error::CoreError;
use academy_core::types::DbId;
use academy_db::models::attendance::{AttendanceRecord, CheckInRequest};
use academy_db::repositories::{AttendanceRepo, LessonRepo};

use crate::engine;
use crate::engine::checkin::CheckInOutcome;
use crate::error::{AppError, AppResult};
use crate::middleware::context::TenantContext;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/attendance/check-in
pub async fn check_in(
    ctx: TenantContext,
    State(state): State<AppState>,
    Json(input): Json<CheckInRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<CheckInOutcome>>)> {
    let outcome = engine::checkin::check_in(
        &state.pool,
        ctx.tenant_id,
        &state.config.settings_defaults,
        &input,
        Utc::now(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: outcome })))
}

/// GET /api/v1/lessons/{id}/attendance
pub async fn list_for_lesson(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(lesson_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<AttendanceRecord>>>> {
    LessonRepo::find_by_id(&state.pool, ctx.tenant_id, lesson_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Lesson",
            id: lesson_id,
        }))?;

    let records = AttendanceRepo::list_for_lesson(&state.pool, ctx.tenant_id, lesson_id).await?;
    Ok(Json(DataResponse { data: records }))
}
