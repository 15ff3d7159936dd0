//! Handlers for a turma's weekly schedule definition.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use validator::Validate;

use academy_core::error::CoreError;
use academy_core::types::DbId;
use academy_db::models::schedule::{ReplaceSchedule, ScheduleWithSlots};
use academy_db::repositories::{ScheduleRepo, TurmaRepo};

use crate::engine::generation::{ensure_lessons_generated, GenerationResult};
use crate::error::{AppError, AppResult};
use crate::middleware::context::TenantContext;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response payload for schedule replacement: the stored definition plus
/// the reconciliation run it triggered.
#[derive(Debug, Serialize)]
pub struct ScheduleReplaceResult {
    pub schedule: ScheduleWithSlots,
    pub generation: GenerationResult,
}

/// GET /api/v1/turmas/{id}/schedule
pub async fn get_schedule(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(turma_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ScheduleWithSlots>>> {
    TurmaRepo::find_by_id(&state.pool, ctx.tenant_id, turma_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Turma",
            id: turma_id,
        }))?;

    let definition = ScheduleRepo::current_for_turma(&state.pool, ctx.tenant_id, turma_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Schedule for turma",
            id: turma_id,
        }))?;
    let slots = ScheduleRepo::slots_for_definition(&state.pool, definition.id).await?;
    Ok(Json(DataResponse {
        data: ScheduleWithSlots { definition, slots },
    }))
}

/// PUT /api/v1/turmas/{id}/schedule
///
/// Replaces the current definition wholesale (the old one is kept as
/// history) and immediately reconciles the turma's lessons against it, so
/// the stored calendar never lags the definition.
pub async fn put_schedule(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(turma_id): Path<DbId>,
    Json(input): Json<ReplaceSchedule>,
) -> AppResult<Json<DataResponse<ScheduleReplaceResult>>> {
    input.validate()?;
    if let Some(until) = input.effective_until {
        if until <= input.effective_from {
            return Err(AppError::Core(CoreError::Validation(
                "effective_until must be after effective_from".into(),
            )));
        }
    }

    TurmaRepo::find_by_id(&state.pool, ctx.tenant_id, turma_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Turma",
            id: turma_id,
        }))?;

    let (definition, slots) =
        ScheduleRepo::replace(&state.pool, ctx.tenant_id, turma_id, &input).await?;
    tracing::info!(
        tenant_id = ctx.tenant_id,
        turma_id,
        definition_id = definition.id,
        slots = slots.len(),
        "Replaced schedule definition"
    );

    let generation = ensure_lessons_generated(
        &state.pool,
        ctx.tenant_id,
        turma_id,
        None,
        &state.config.settings_defaults,
        Utc::now(),
    )
    .await?;

    Ok(Json(DataResponse {
        data: ScheduleReplaceResult {
            schedule: ScheduleWithSlots { definition, slots },
            generation,
        },
    }))
}
