//! Repository for the `tenant_settings` table.
//!
//! One row per tenant. Rows are seeded at provisioning from the
//! server-level defaults; the patch update leaves absent fields unchanged
//! via COALESCE so concurrent writers never clobber each other's fields
//! with stale reads.

use academy_core::types::DbId;
use sqlx::PgPool;

use crate::models::tenant::{TenantSettings, UpdateTenantSettings};

/// Column list for `tenant_settings` queries.
const COLUMNS: &str = "\
    id, tenant_id, checkin_early_minutes, checkin_late_minutes, \
    autocomplete_grace_minutes, horizon_days, require_active_subscription, \
    created_at, updated_at";

/// Server-level default values used when seeding a tenant's settings row.
#[derive(Debug, Clone, Copy)]
pub struct SettingsDefaults {
    pub checkin_early_minutes: i32,
    pub checkin_late_minutes: i32,
    pub autocomplete_grace_minutes: i32,
    pub horizon_days: i32,
    pub require_active_subscription: bool,
}

/// Provides operations for per-tenant policy settings.
pub struct TenantSettingsRepo;

impl TenantSettingsRepo {
    /// Seed the settings row for a new tenant from the server defaults.
    ///
    /// Conflict-tolerant: if the row already exists it is left untouched,
    /// so re-provisioning is harmless.
    pub async fn seed(
        pool: &PgPool,
        tenant_id: DbId,
        defaults: &SettingsDefaults,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO tenant_settings \
                 (tenant_id, checkin_early_minutes, checkin_late_minutes, \
                  autocomplete_grace_minutes, horizon_days, require_active_subscription) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (tenant_id) DO NOTHING",
        )
        .bind(tenant_id)
        .bind(defaults.checkin_early_minutes)
        .bind(defaults.checkin_late_minutes)
        .bind(defaults.autocomplete_grace_minutes)
        .bind(defaults.horizon_days)
        .bind(defaults.require_active_subscription)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Fetch a tenant's settings row, if one exists.
    pub async fn find_for_tenant(
        pool: &PgPool,
        tenant_id: DbId,
    ) -> Result<Option<TenantSettings>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tenant_settings WHERE tenant_id = $1");
        sqlx::query_as::<_, TenantSettings>(&query)
            .bind(tenant_id)
            .fetch_optional(pool)
            .await
    }

    /// Patch a tenant's settings. Absent fields keep their current value.
    ///
    /// Returns `None` when the tenant has no settings row.
    pub async fn update(
        pool: &PgPool,
        tenant_id: DbId,
        input: &UpdateTenantSettings,
    ) -> Result<Option<TenantSettings>, sqlx::Error> {
        let query = format!(
            "UPDATE tenant_settings SET \
                 checkin_early_minutes = COALESCE($2, checkin_early_minutes), \
                 checkin_late_minutes = COALESCE($3, checkin_late_minutes), \
                 autocomplete_grace_minutes = COALESCE($4, autocomplete_grace_minutes), \
                 horizon_days = COALESCE($5, horizon_days), \
                 require_active_subscription = COALESCE($6, require_active_subscription) \
             WHERE tenant_id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TenantSettings>(&query)
            .bind(tenant_id)
            .bind(input.checkin_early_minutes)
            .bind(input.checkin_late_minutes)
            .bind(input.autocomplete_grace_minutes)
            .bind(input.horizon_days)
            .bind(input.require_active_subscription)
            .fetch_optional(pool)
            .await
    }
}
