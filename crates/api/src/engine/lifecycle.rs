//! Manual lesson lifecycle transitions.
//!
//! Each transition is one compare-and-set UPDATE carrying the expected
//! status in its WHERE clause. A miss is classified by re-reading the row,
//! so the loser of a concurrent race reports the same `InvalidTransition`
//! a plainly illegal call would, and a deleted row reports not-found.

use sqlx::PgPool;

use academy_core::error::CoreError;
use academy_core::lifecycle::LessonStatus;
use academy_core::types::DbId;
use academy_db::models::lesson::Lesson;
use academy_db::repositories::LessonRepo;

use crate::error::AppError;

/// Scheduled -> InProgress, stamping `started_at`.
pub async fn start_lesson(pool: &PgPool, tenant_id: DbId, id: DbId) -> Result<Lesson, AppError> {
    match LessonRepo::start(pool, tenant_id, id).await? {
        Some(lesson) => {
            tracing::info!(tenant_id, lesson_id = id, "Lesson started");
            Ok(lesson)
        }
        None => Err(transition_refused(pool, tenant_id, id, LessonStatus::InProgress).await),
    }
}

/// InProgress -> Completed, freezing the attendance count.
pub async fn finish_lesson(pool: &PgPool, tenant_id: DbId, id: DbId) -> Result<Lesson, AppError> {
    match LessonRepo::finish(pool, tenant_id, id).await? {
        Some(lesson) => {
            tracing::info!(
                tenant_id,
                lesson_id = id,
                attendance = lesson.attendance_count,
                "Lesson finished"
            );
            Ok(lesson)
        }
        None => Err(transition_refused(pool, tenant_id, id, LessonStatus::Completed).await),
    }
}

/// Scheduled or InProgress -> Cancelled, with an optional reason.
pub async fn cancel_lesson(
    pool: &PgPool,
    tenant_id: DbId,
    id: DbId,
    reason: Option<&str>,
) -> Result<Lesson, AppError> {
    match LessonRepo::cancel(pool, tenant_id, id, reason).await? {
        Some(lesson) => {
            tracing::info!(tenant_id, lesson_id = id, "Lesson cancelled");
            Ok(lesson)
        }
        None => Err(transition_refused(pool, tenant_id, id, LessonStatus::Cancelled).await),
    }
}

/// Work out why a compare-and-set transition matched no row.
async fn transition_refused(
    pool: &PgPool,
    tenant_id: DbId,
    id: DbId,
    target: LessonStatus,
) -> AppError {
    match LessonRepo::find_by_id(pool, tenant_id, id).await {
        Ok(Some(lesson)) => match lesson.status() {
            Some(actual) => AppError::Core(CoreError::InvalidTransition {
                from: actual,
                to: target,
            }),
            None => AppError::Core(CoreError::Internal(format!(
                "Lesson {} has unknown status id {}",
                lesson.id, lesson.status_id
            ))),
        },
        Ok(None) => AppError::Core(CoreError::NotFound {
            entity: "Lesson",
            id,
        }),
        Err(err) => AppError::Database(err),
    }
}
