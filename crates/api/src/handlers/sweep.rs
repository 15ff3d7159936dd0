//! Handler for the manually triggered auto-completion sweep.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use academy_core::types::DbId;
use academy_db::models::lesson::SweepRequest;

use crate::engine;
use crate::error::AppResult;
use crate::middleware::context::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response payload for a sweep run.
#[derive(Debug, Serialize)]
pub struct SweepOutcome {
    /// Ids of the lessons this run auto-completed.
    pub auto_completed: Vec<DbId>,
}

/// POST /api/v1/admin/sweep/auto-complete
///
/// Runs the same sweep the background loop performs, for the caller's
/// tenant only. Useful after bulk imports and in tests.
pub async fn auto_complete(
    RequireAdmin(ctx): RequireAdmin,
    State(state): State<AppState>,
    body: Option<Json<SweepRequest>>,
) -> AppResult<Json<DataResponse<SweepOutcome>>> {
    let input = body.map(|Json(b)| b).unwrap_or_default();
    let at = input.at.unwrap_or_else(Utc::now);
    let auto_completed = engine::sweep::sweep_tenant(
        &state.pool,
        ctx.tenant_id,
        &state.config.settings_defaults,
        at,
    )
    .await?;
    Ok(Json(DataResponse {
        data: SweepOutcome { auto_completed },
    }))
}
