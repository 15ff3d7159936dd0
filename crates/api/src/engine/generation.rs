//! Lesson generation: expand the current schedule definition into dated
//! lesson rows and reconcile against what is already stored.
//!
//! Execution is conflict-tolerant end to end. Inserts ride the
//! `(turma_id, scheduled_date, start_time)` uniqueness key, cancellations
//! are compare-and-set on Scheduled status, and a failure on one occurrence
//! is recorded without aborting the rest of the run. Running generation
//! twice with the same inputs is a no-op.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use academy_core::error::CoreError;
use academy_core::expander::expand;
use academy_core::generation;
use academy_core::types::DbId;
use academy_db::models::lesson::Lesson;
use academy_db::repositories::lesson_repo::NewLesson;
use academy_db::repositories::tenant_settings_repo::SettingsDefaults;
use academy_db::repositories::{LessonRepo, ScheduleRepo, TurmaRepo};

use crate::error::AppError;

use super::{effective_settings, load_tenant, tenant_local};

/// Hard ceiling on how far an explicit horizon may reach past today.
const MAX_HORIZON_DAYS_AHEAD: i64 = 730;

/// Cancellation reason stamped on lessons orphaned by a schedule change.
const SCHEDULE_CHANGE_REASON: &str = "schedule_changed";

/// Outcome of one generation run for one turma.
#[derive(Debug, Default, Serialize)]
pub struct GenerationResult {
    /// Ids of lessons created by this run, in chronological order.
    pub created: Vec<DbId>,
    /// Ids of lessons whose occurrence key was already materialized.
    pub skipped: Vec<DbId>,
    /// Ids of Scheduled lessons cancelled because their occurrence left the
    /// definition.
    pub cancelled: Vec<DbId>,
    /// Occurrences whose persistence failed. The run continues past them.
    pub failed: Vec<FailedOccurrence>,
}

/// One occurrence that could not be persisted as planned.
#[derive(Debug, Serialize)]
pub struct FailedOccurrence {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub error: String,
}

/// Materialize the turma's current schedule as lesson rows up to a horizon.
///
/// The window starts at the tenant-local today (never in the past) clipped
/// by the definition's effective range, and ends at `horizon_end` or, when
/// absent, today plus the tenant's `horizon_days`. Occurrences already
/// stored are skipped whatever their status; Scheduled lessons inside the
/// window that no longer match any occurrence are cancelled, never deleted.
pub async fn ensure_lessons_generated(
    pool: &PgPool,
    tenant_id: DbId,
    turma_id: DbId,
    horizon_end: Option<NaiveDate>,
    defaults: &SettingsDefaults,
    now: DateTime<Utc>,
) -> Result<GenerationResult, AppError> {
    let tenant = load_tenant(pool, tenant_id).await?;
    let turma = TurmaRepo::find_by_id(pool, tenant_id, turma_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Turma",
            id: turma_id,
        }))?;

    let definition_row = ScheduleRepo::current_for_turma(pool, tenant_id, turma_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(format!(
                "Turma {turma_id} has no current schedule definition"
            )))
        })?;
    let slot_rows = ScheduleRepo::slots_for_definition(pool, definition_row.id).await?;
    let definition = definition_row.to_core(&slot_rows)?;

    let settings = effective_settings(pool, tenant_id, defaults).await?;
    let today = tenant_local(&tenant, now)?.date();

    let horizon_end = match horizon_end {
        Some(end) => {
            if end > today + Duration::days(MAX_HORIZON_DAYS_AHEAD) {
                return Err(AppError::Core(CoreError::Validation(format!(
                    "horizon_end must be within {MAX_HORIZON_DAYS_AHEAD} days of today"
                ))));
            }
            end
        }
        None => today + Duration::days(i64::from(settings.horizon_days)),
    };

    // Past dates are never generated; the definition's own start clips the
    // window from the other side.
    let window_start = today.max(definition.effective_from);
    let expanded = expand(&definition, window_start, horizon_end);

    let existing = LessonRepo::list_from_date(pool, tenant_id, turma_id, window_start).await?;
    let windows = existing
        .iter()
        .map(Lesson::to_window)
        .collect::<Result<Vec<_>, _>>()?;
    let max_number = LessonRepo::max_lesson_number(pool, tenant_id, turma_id).await?;

    let plan = generation::plan(&expanded, &windows, window_start, horizon_end, max_number);

    let mut result = GenerationResult {
        skipped: plan.skip,
        ..GenerationResult::default()
    };

    for planned in &plan.create {
        let occurrence = planned.occurrence;
        let new = NewLesson {
            scheduled_date: occurrence.date,
            start_time: occurrence.start_time,
            end_date: occurrence.end_date,
            end_time: occurrence.end_time,
            lesson_number: planned.lesson_number,
            instructor_id: turma.instructor_id,
        };
        match LessonRepo::insert_generated(pool, tenant_id, turma_id, &new).await {
            Ok(Some(lesson)) => result.created.push(lesson.id),
            Ok(None) => {
                // Lost an insert race on the uniqueness key; the surviving
                // row counts as skipped.
                match LessonRepo::find_by_slot(
                    pool,
                    tenant_id,
                    turma_id,
                    occurrence.date,
                    occurrence.start_time,
                )
                .await?
                {
                    Some(winner) => result.skipped.push(winner.id),
                    None => result.failed.push(FailedOccurrence {
                        date: occurrence.date,
                        start_time: occurrence.start_time,
                        error: "occurrence key taken but no surviving row found".into(),
                    }),
                }
            }
            Err(err) => {
                tracing::warn!(
                    turma_id,
                    date = %occurrence.date,
                    error = %err,
                    "Failed to insert generated lesson"
                );
                result.failed.push(FailedOccurrence {
                    date: occurrence.date,
                    start_time: occurrence.start_time,
                    error: err.to_string(),
                });
            }
        }
    }

    // Key lookup for reporting cancellation misses; every cancel candidate
    // came out of `existing`.
    let keys: HashMap<DbId, (NaiveDate, NaiveTime)> = existing
        .iter()
        .map(|l| (l.id, (l.scheduled_date, l.start_time)))
        .collect();

    for id in &plan.cancel {
        match LessonRepo::cancel_scheduled(pool, tenant_id, *id, SCHEDULE_CHANGE_REASON).await {
            Ok(Some(_)) => result.cancelled.push(*id),
            Ok(None) => {
                // The lesson left Scheduled status between planning and now
                // (someone started it); orphaned but live lessons are left
                // to their instructor.
                let (date, start_time) = keys.get(id).copied().unwrap_or_default();
                result.failed.push(FailedOccurrence {
                    date,
                    start_time,
                    error: format!("lesson {id} is no longer in Scheduled status"),
                });
            }
            Err(err) => {
                let (date, start_time) = keys.get(id).copied().unwrap_or_default();
                tracing::warn!(turma_id, lesson_id = id, error = %err, "Failed to cancel lesson");
                result.failed.push(FailedOccurrence {
                    date,
                    start_time,
                    error: err.to_string(),
                });
            }
        }
    }

    tracing::info!(
        tenant_id,
        turma_id,
        %horizon_end,
        created = result.created.len(),
        skipped = result.skipped.len(),
        cancelled = result.cancelled.len(),
        failed = result.failed.len(),
        "Lesson generation run finished"
    );

    Ok(result)
}
