//! Handlers for lesson generation, listing, resolution and lifecycle.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;

use academy_core::error::CoreError;
use academy_core::lifecycle::LessonStatus;
use academy_core::types::DbId;
use academy_db::models::lesson::{
    CancelLesson, GenerateLessons, Lesson, LessonListQuery, ResolveQuery, UpdateLesson,
};
use academy_db::repositories::lesson_repo::LessonFilters;
use academy_db::repositories::{LessonRepo, TurmaRepo};

use crate::engine;
use crate::engine::generation::GenerationResult;
use crate::engine::resolve::ResolutionPayload;
use crate::error::{AppError, AppResult};
use crate::middleware::context::TenantContext;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/turmas/{id}/lessons/generate
pub async fn generate(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(turma_id): Path<DbId>,
    body: Option<Json<GenerateLessons>>,
) -> AppResult<Json<DataResponse<GenerationResult>>> {
    let input = body.map(|Json(b)| b).unwrap_or_default();
    let result = engine::generation::ensure_lessons_generated(
        &state.pool,
        ctx.tenant_id,
        turma_id,
        input.horizon_end,
        &state.config.settings_defaults,
        Utc::now(),
    )
    .await?;
    Ok(Json(DataResponse { data: result }))
}

/// GET /api/v1/turmas/{id}/lessons
pub async fn list_for_turma(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(turma_id): Path<DbId>,
    Query(query): Query<LessonListQuery>,
) -> AppResult<Json<DataResponse<Vec<Lesson>>>> {
    TurmaRepo::find_by_id(&state.pool, ctx.tenant_id, turma_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Turma",
            id: turma_id,
        }))?;

    let status_id = query
        .status
        .as_deref()
        .map(|raw| {
            LessonStatus::from_str_value(raw)
                .map(LessonStatus::id)
                .map_err(|e| AppError::Core(CoreError::Validation(e)))
        })
        .transpose()?;

    let filters = LessonFilters {
        from: query.from,
        to: query.to,
        status_id,
        limit: query.limit,
        offset: query.offset,
    };
    let lessons = LessonRepo::list_for_turma(&state.pool, ctx.tenant_id, turma_id, &filters).await?;
    Ok(Json(DataResponse { data: lessons }))
}

/// GET /api/v1/turmas/{id}/lessons/current
pub async fn current_for_turma(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(turma_id): Path<DbId>,
    Query(query): Query<ResolveQuery>,
) -> AppResult<Json<DataResponse<ResolutionPayload>>> {
    let at = query.at.unwrap_or_else(Utc::now);
    let payload =
        engine::resolve::resolve_for_turma(&state.pool, ctx.tenant_id, turma_id, at).await?;
    Ok(Json(DataResponse { data: payload }))
}

/// GET /api/v1/instructors/{id}/lessons/current
pub async fn current_for_instructor(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(instructor_id): Path<DbId>,
    Query(query): Query<ResolveQuery>,
) -> AppResult<Json<DataResponse<ResolutionPayload>>> {
    let at = query.at.unwrap_or_else(Utc::now);
    let payload =
        engine::resolve::resolve_for_instructor(&state.pool, ctx.tenant_id, instructor_id, at)
            .await?;
    Ok(Json(DataResponse { data: payload }))
}

/// GET /api/v1/lessons/{id}
pub async fn get_by_id(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Lesson>>> {
    let lesson = LessonRepo::find_by_id(&state.pool, ctx.tenant_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Lesson",
            id,
        }))?;
    Ok(Json(DataResponse { data: lesson }))
}

/// PATCH /api/v1/lessons/{id}
///
/// Only the lesson plan reference is editable; an absent field leaves the
/// assignment untouched while an explicit null clears it.
pub async fn update(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateLesson>,
) -> AppResult<Json<DataResponse<Lesson>>> {
    let lesson = match input.lesson_plan_id {
        Some(plan) => {
            LessonRepo::set_lesson_plan(&state.pool, ctx.tenant_id, id, plan.as_deref()).await?
        }
        None => LessonRepo::find_by_id(&state.pool, ctx.tenant_id, id).await?,
    }
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Lesson",
        id,
    }))?;
    Ok(Json(DataResponse { data: lesson }))
}

/// POST /api/v1/lessons/{id}/start
pub async fn start(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Lesson>>> {
    let lesson = engine::lifecycle::start_lesson(&state.pool, ctx.tenant_id, id).await?;
    Ok(Json(DataResponse { data: lesson }))
}

/// POST /api/v1/lessons/{id}/finish
pub async fn finish(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Lesson>>> {
    let lesson = engine::lifecycle::finish_lesson(&state.pool, ctx.tenant_id, id).await?;
    Ok(Json(DataResponse { data: lesson }))
}

/// POST /api/v1/lessons/{id}/cancel
pub async fn cancel(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Option<Json<CancelLesson>>,
) -> AppResult<Json<DataResponse<Lesson>>> {
    let input = body.map(|Json(b)| b).unwrap_or_default();
    let lesson =
        engine::lifecycle::cancel_lesson(&state.pool, ctx.tenant_id, id, input.reason.as_deref())
            .await?;
    Ok(Json(DataResponse { data: lesson }))
}
