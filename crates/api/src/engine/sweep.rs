//! Auto-completion sweep execution.
//!
//! Planning is pure; each overdue lesson is then closed with a
//! compare-and-set, so a concurrent manual finish or cancel wins the race
//! and the sweep moves on. Running the sweep twice back to back completes
//! nothing the second time.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use academy_core::sweep::plan_auto_complete;
use academy_core::types::DbId;
use academy_db::models::lesson::Lesson;
use academy_db::repositories::tenant_settings_repo::SettingsDefaults;
use academy_db::repositories::{LessonRepo, TenantRepo};

use crate::error::AppError;

use super::{effective_settings, load_tenant, tenant_local};

/// Auto-complete every lesson of one tenant whose window ended more than
/// the tenant's grace period ago. Returns the ids completed by this run.
pub async fn sweep_tenant(
    pool: &PgPool,
    tenant_id: DbId,
    defaults: &SettingsDefaults,
    now: DateTime<Utc>,
) -> Result<Vec<DbId>, AppError> {
    let tenant = load_tenant(pool, tenant_id).await?;
    let settings = effective_settings(pool, tenant_id, defaults).await?;
    let local = tenant_local(&tenant, now)?;

    let candidates = LessonRepo::overdue_candidates(pool, tenant_id, local.date()).await?;
    let windows = candidates
        .iter()
        .map(Lesson::to_window)
        .collect::<Result<Vec<_>, _>>()?;
    let overdue = plan_auto_complete(
        &windows,
        local,
        i64::from(settings.autocomplete_grace_minutes),
    );

    let mut completed = Vec::with_capacity(overdue.len());
    for id in overdue {
        match LessonRepo::auto_complete(pool, tenant_id, id).await? {
            Some(_) => completed.push(id),
            // Someone finished or cancelled it between planning and now.
            None => tracing::debug!(tenant_id, lesson_id = id, "Sweep lost transition race"),
        }
    }

    if completed.is_empty() {
        tracing::debug!(tenant_id, "Auto-completion sweep found nothing overdue");
    } else {
        tracing::info!(
            tenant_id,
            completed = completed.len(),
            "Auto-completion sweep finished"
        );
    }
    Ok(completed)
}

/// Sweep every tenant, isolating failures so one tenant's bad data never
/// blocks the rest. Returns the total number of lessons completed.
pub async fn sweep_all_tenants(
    pool: &PgPool,
    defaults: &SettingsDefaults,
    now: DateTime<Utc>,
) -> Result<usize, AppError> {
    let tenants = TenantRepo::list(pool).await?;
    let mut total = 0;
    for tenant in tenants {
        match sweep_tenant(pool, tenant.id, defaults, now).await {
            Ok(completed) => total += completed.len(),
            Err(err) => {
                tracing::warn!(tenant_id = tenant.id, error = %err, "Sweep failed for tenant");
            }
        }
    }
    Ok(total)
}
