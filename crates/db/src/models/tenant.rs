//! Tenant and per-tenant policy settings models.

use academy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `tenants` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tenant {
    pub id: DbId,
    pub name: String,
    /// IANA timezone name, e.g. `America/Sao_Paulo`. All schedule and lesson
    /// times for this tenant are wall clock in this zone.
    pub timezone: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for provisioning a tenant via `POST /api/v1/admin/tenants`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTenant {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// IANA timezone name. Defaults to UTC when omitted. Checked against the
    /// tz database by the handler.
    pub timezone: Option<String>,
}

/// A row from the `tenant_settings` table.
///
/// One row per tenant, created at provisioning time from the server-level
/// defaults. All durations are minutes.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TenantSettings {
    pub id: DbId,
    pub tenant_id: DbId,
    /// Minutes before a lesson's start during which check-in is accepted.
    pub checkin_early_minutes: i32,
    /// Minutes after a lesson's end during which check-in is accepted.
    pub checkin_late_minutes: i32,
    /// Minutes after a lesson's end before the sweep auto-completes it.
    pub autocomplete_grace_minutes: i32,
    /// How far ahead, in days, lesson generation materializes occurrences.
    pub horizon_days: i32,
    /// When true, check-in is refused for students without an active
    /// subscription.
    pub require_active_subscription: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `PUT /api/v1/tenant/settings`. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTenantSettings {
    #[validate(range(min = 0, max = 720))]
    pub checkin_early_minutes: Option<i32>,
    #[validate(range(min = 0, max = 720))]
    pub checkin_late_minutes: Option<i32>,
    #[validate(range(min = 0, max = 1440))]
    pub autocomplete_grace_minutes: Option<i32>,
    #[validate(range(min = 1, max = 365))]
    pub horizon_days: Option<i32>,
    pub require_active_subscription: Option<bool>,
}
