//! Attendance check-in: grace-window matching plus the duplicate guard.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::PgPool;

use academy_core::checkin::{eligible_lesson, CheckInWindows};
use academy_core::error::CoreError;
use academy_core::types::DbId;
use academy_db::models::attendance::{AttendanceRecord, CheckInRequest};
use academy_db::models::lesson::Lesson;
use academy_db::repositories::tenant_settings_repo::SettingsDefaults;
use academy_db::repositories::{AttendanceRepo, LessonRepo, StudentRepo, TurmaRepo};

use crate::error::AppError;

use super::{effective_settings, load_tenant, tenant_local};

/// A successful check-in: the stored record and the lesson it landed on.
#[derive(Debug, Serialize)]
pub struct CheckInOutcome {
    pub lesson: Lesson,
    pub record: AttendanceRecord,
}

/// Record a student's attendance against the eligible lesson of a turma.
///
/// The lesson is selected by the tenant's wall clock at `at` (defaulting to
/// `now`): the currently running lesson wins, otherwise the nearest lesson
/// whose early/late grace window contains the instant. One record per
/// student per lesson; a repeat is refused as a duplicate.
pub async fn check_in(
    pool: &PgPool,
    tenant_id: DbId,
    defaults: &SettingsDefaults,
    request: &CheckInRequest,
    now: DateTime<Utc>,
) -> Result<CheckInOutcome, AppError> {
    let tenant = load_tenant(pool, tenant_id).await?;
    let student = StudentRepo::find_by_id(pool, tenant_id, request.student_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Student",
            id: request.student_id,
        }))?;
    TurmaRepo::find_by_id(pool, tenant_id, request.turma_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Turma",
            id: request.turma_id,
        }))?;

    let settings = effective_settings(pool, tenant_id, defaults).await?;
    if settings.require_active_subscription && !student.subscription_active {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Student {} has no active subscription",
            student.id
        ))));
    }

    let at = request.at.unwrap_or(now);
    let local = tenant_local(&tenant, at)?;

    // A midnight-crossing lesson from yesterday can still be inside its
    // late grace window, so candidate loading reaches one day back.
    let min_end_date = local.date() - Duration::days(1);
    let candidates =
        LessonRepo::open_for_turma(pool, tenant_id, request.turma_id, min_end_date).await?;
    let windows = candidates
        .iter()
        .map(Lesson::to_window)
        .collect::<Result<Vec<_>, _>>()?;

    let grace = CheckInWindows {
        early_minutes: i64::from(settings.checkin_early_minutes),
        late_minutes: i64::from(settings.checkin_late_minutes),
    };
    let lesson_id = eligible_lesson(&windows, local, grace)?;

    let record = match AttendanceRepo::check_in(
        pool,
        tenant_id,
        lesson_id,
        request.student_id,
        at,
        request.method,
    )
    .await?
    {
        Some(record) => record,
        None => {
            tracing::debug!(
                tenant_id,
                student_id = request.student_id,
                lesson_id,
                "Duplicate check-in refused"
            );
            return Err(AppError::Core(CoreError::DuplicateCheckIn {
                student_id: request.student_id,
                lesson_id,
            }));
        }
    };

    // The eligible id came out of `candidates`, so this lookup cannot miss.
    let lesson = candidates
        .into_iter()
        .find(|l| l.id == lesson_id)
        .ok_or_else(|| {
            AppError::Core(CoreError::Internal(format!(
                "Lesson {lesson_id} vanished during check-in"
            )))
        })?;

    tracing::info!(
        tenant_id,
        student_id = request.student_id,
        lesson_id,
        method = request.method.as_str(),
        "Student checked in"
    );

    Ok(CheckInOutcome { lesson, record })
}
