//! Handlers for the `/turmas` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use academy_core::error::CoreError;
use academy_core::types::DbId;
use academy_db::models::turma::{CreateTurma, Turma, TurmaListQuery, UpdateTurma};
use academy_db::repositories::TurmaRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::context::TenantContext;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/turmas
pub async fn create(
    ctx: TenantContext,
    State(state): State<AppState>,
    Json(input): Json<CreateTurma>,
) -> AppResult<(StatusCode, Json<DataResponse<Turma>>)> {
    input.validate()?;
    let turma = TurmaRepo::create(&state.pool, ctx.tenant_id, &input).await?;
    tracing::info!(tenant_id = ctx.tenant_id, turma_id = turma.id, "Created turma");
    Ok((StatusCode::CREATED, Json(DataResponse { data: turma })))
}

/// GET /api/v1/turmas
pub async fn list(
    ctx: TenantContext,
    State(state): State<AppState>,
    Query(params): Query<TurmaListQuery>,
) -> AppResult<Json<DataResponse<Vec<Turma>>>> {
    let turmas = TurmaRepo::list(&state.pool, ctx.tenant_id, &params).await?;
    Ok(Json(DataResponse { data: turmas }))
}

/// GET /api/v1/turmas/{id}
pub async fn get_by_id(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Turma>>> {
    let turma = TurmaRepo::find_by_id(&state.pool, ctx.tenant_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Turma",
            id,
        }))?;
    Ok(Json(DataResponse { data: turma }))
}

/// PUT /api/v1/turmas/{id}
///
/// Changing `instructor_id` only affects lessons generated afterwards;
/// rows already materialized keep the instructor they were created with.
pub async fn update(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTurma>,
) -> AppResult<Json<DataResponse<Turma>>> {
    input.validate()?;
    let turma = TurmaRepo::update(&state.pool, ctx.tenant_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Turma",
            id,
        }))?;
    Ok(Json(DataResponse { data: turma }))
}
