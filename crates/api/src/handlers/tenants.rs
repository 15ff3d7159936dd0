//! Handlers for tenant provisioning and per-tenant policy settings.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use academy_core::error::CoreError;
use academy_db::models::tenant::{CreateTenant, Tenant, TenantSettings, UpdateTenantSettings};
use academy_db::repositories::{TenantRepo, TenantSettingsRepo};

use crate::engine;
use crate::error::{AppError, AppResult};
use crate::middleware::context::{RequireAdmin, TenantContext};
use crate::response::DataResponse;
use crate::state::AppState;

/// Timezone assigned to tenants provisioned without one.
const DEFAULT_TIMEZONE: &str = "UTC";

/// POST /api/v1/admin/tenants
///
/// Provisions the tenant and seeds its settings row from the server
/// defaults in one go, so policy lookups never miss.
pub async fn create(
    RequireAdmin(_ctx): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateTenant>,
) -> AppResult<(StatusCode, Json<DataResponse<Tenant>>)> {
    input.validate()?;
    let timezone = input.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE);
    if timezone.parse::<chrono_tz::Tz>().is_err() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown IANA timezone '{timezone}'"
        ))));
    }

    let tenant = TenantRepo::create(&state.pool, &input.name, timezone).await?;
    TenantSettingsRepo::seed(&state.pool, tenant.id, &state.config.settings_defaults).await?;
    tracing::info!(tenant_id = tenant.id, timezone, "Provisioned tenant");
    Ok((StatusCode::CREATED, Json(DataResponse { data: tenant })))
}

/// GET /api/v1/admin/tenants
pub async fn list(
    RequireAdmin(_ctx): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Tenant>>>> {
    let tenants = TenantRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: tenants }))
}

/// GET /api/v1/tenant/settings
pub async fn get_settings(
    ctx: TenantContext,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<TenantSettings>>> {
    engine::load_tenant(&state.pool, ctx.tenant_id).await?;
    let settings =
        engine::effective_settings(&state.pool, ctx.tenant_id, &state.config.settings_defaults)
            .await?;
    Ok(Json(DataResponse { data: settings }))
}

/// PUT /api/v1/tenant/settings
pub async fn update_settings(
    RequireAdmin(ctx): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<UpdateTenantSettings>,
) -> AppResult<Json<DataResponse<TenantSettings>>> {
    input.validate()?;
    engine::load_tenant(&state.pool, ctx.tenant_id).await?;
    // Make sure the row exists before patching it; tenants provisioned
    // before the settings table get one lazily.
    engine::effective_settings(&state.pool, ctx.tenant_id, &state.config.settings_defaults)
        .await?;

    let settings = TenantSettingsRepo::update(&state.pool, ctx.tenant_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Settings for tenant",
            id: ctx.tenant_id,
        }))?;
    tracing::info!(tenant_id = ctx.tenant_id, "Updated tenant settings");
    Ok(Json(DataResponse { data: settings }))
}
