//! Orchestration between the pure scheduling logic and storage.
//!
//! The decision logic in `academy_core` never touches a clock or the
//! database; these modules load the rows, convert the acting instant into
//! the tenant's wall clock, run the pure functions and persist the outcome.
//! Every entry point takes `now` as a parameter so handlers, background
//! loops and tests share one code path.

pub mod checkin;
pub mod generation;
pub mod lifecycle;
pub mod resolve;
pub mod sweep;

use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::PgPool;

use academy_core::error::CoreError;
use academy_core::types::DbId;
use academy_db::models::tenant::{Tenant, TenantSettings};
use academy_db::repositories::tenant_settings_repo::SettingsDefaults;
use academy_db::repositories::{TenantRepo, TenantSettingsRepo};

use crate::error::AppError;

pub(crate) async fn load_tenant(pool: &PgPool, tenant_id: DbId) -> Result<Tenant, AppError> {
    TenantRepo::find_by_id(pool, tenant_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Tenant",
                id: tenant_id,
            })
        })
}

/// The tenant's wall-clock reading of `at`.
///
/// Timezones are validated at provisioning, so a parse failure here means
/// the stored value was corrupted out of band.
pub(crate) fn tenant_local(tenant: &Tenant, at: DateTime<Utc>) -> Result<NaiveDateTime, AppError> {
    let tz: chrono_tz::Tz = tenant.timezone.parse().map_err(|_| {
        AppError::Core(CoreError::Internal(format!(
            "Tenant {} has an invalid timezone '{}'",
            tenant.id, tenant.timezone
        )))
    })?;
    Ok(at.with_timezone(&tz).naive_local())
}

/// The tenant's settings row, seeding one from the server defaults when it
/// is missing (a tenant provisioned before the settings table existed, or
/// an interrupted provisioning).
pub(crate) async fn effective_settings(
    pool: &PgPool,
    tenant_id: DbId,
    defaults: &SettingsDefaults,
) -> Result<TenantSettings, AppError> {
    if let Some(settings) = TenantSettingsRepo::find_for_tenant(pool, tenant_id).await? {
        return Ok(settings);
    }
    TenantSettingsRepo::seed(pool, tenant_id, defaults).await?;
    TenantSettingsRepo::find_for_tenant(pool, tenant_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Internal(format!(
                "Settings row for tenant {tenant_id} missing after seeding"
            )))
        })
}
