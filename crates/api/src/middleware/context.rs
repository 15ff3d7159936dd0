//! Tenant-scoped identity extractor for Axum handlers.
//!
//! Authentication itself happens upstream: an identity-aware proxy
//! validates the session against the external identity provider and
//! forwards the caller's identity in the `x-caller-id`, `x-tenant-id` and
//! `x-role` headers. This extractor parses and checks those headers;
//! requests reaching the service without them are rejected with 401.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use academy_core::error::CoreError;
use academy_core::roles::{ROLE_ADMIN, VALID_ROLES};
use academy_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

/// Caller identity extracted from the proxy headers.
///
/// Use this as an extractor parameter in any handler that operates on
/// tenant data:
///
/// ```ignore
/// async fn my_handler(ctx: TenantContext) -> AppResult<Json<()>> {
///     tracing::info!(tenant_id = ctx.tenant_id, role = %ctx.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TenantContext {
    /// Principal id issued by the identity provider.
    pub caller_id: DbId,
    /// Tenant every query in the request is scoped to.
    pub tenant_id: DbId,
    /// One of the role names in [`academy_core::roles::VALID_ROLES`].
    pub role: String,
}

fn header_id(parts: &Parts, name: &'static str) -> Result<DbId, AppError> {
    let raw = parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(format!("Missing {name} header")))
        })?;
    raw.parse().map_err(|_| {
        AppError::Core(CoreError::Unauthorized(format!(
            "Invalid {name} header: expected a numeric id"
        )))
    })
}

impl FromRequestParts<AppState> for TenantContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let caller_id = header_id(parts, "x-caller-id")?;
        let tenant_id = header_id(parts, "x-tenant-id")?;

        let role = parts
            .headers
            .get("x-role")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Missing x-role header".into()))
            })?;
        if !VALID_ROLES.contains(&role) {
            return Err(AppError::Core(CoreError::Unauthorized(format!(
                "Unknown role '{role}'"
            ))));
        }

        Ok(TenantContext {
            caller_id,
            tenant_id,
            role: role.to_string(),
        })
    }
}

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(ctx): RequireAdmin) -> AppResult<Json<()>> {
///     // ctx is guaranteed to carry the admin role here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub TenantContext);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = TenantContext::from_request_parts(parts, state).await?;
        if ctx.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(ctx))
    }
}
