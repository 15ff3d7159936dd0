//! Repository for the `lessons` table.
//!
//! Status mutations are compare-and-set: the UPDATE carries the expected
//! current status in its WHERE clause and returns the row only when it
//! matched. A `None` from those methods means the precondition failed (or
//! the lesson does not exist); the engine re-reads to tell the two apart.
//! Generated inserts lean on `uq_lessons_turma_date_start` so a duplicate
//! insert race loses benignly instead of erroring.

use academy_core::lifecycle::{LessonStatus, StatusId};
use academy_core::types::DbId;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::lesson::Lesson;

/// Column list for `lessons` queries.
const COLUMNS: &str = "\
    id, tenant_id, turma_id, scheduled_date, start_time, end_date, end_time, \
    status_id, lesson_number, instructor_id, lesson_plan_id, \
    started_at, completed_at, cancelled_at, cancel_reason, \
    auto_completed, attendance_count, created_at, updated_at";

/// Maximum page size for lesson listing.
const MAX_LIMIT: i64 = 500;

/// Default page size for lesson listing.
const DEFAULT_LIMIT: i64 = 100;

/// Resolved filters for lesson listing, built by the handler from the wire
/// query.
#[derive(Debug, Default)]
pub struct LessonFilters {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status_id: Option<StatusId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A new lesson row to materialize from an expanded occurrence.
#[derive(Debug, Clone, Copy)]
pub struct NewLesson {
    pub scheduled_date: NaiveDate,
    pub start_time: chrono::NaiveTime,
    pub end_date: NaiveDate,
    pub end_time: chrono::NaiveTime,
    pub lesson_number: i32,
    pub instructor_id: DbId,
}

/// Provides CRUD and state transition operations for lessons.
pub struct LessonRepo;

impl LessonRepo {
    /// Insert a generated lesson in Scheduled status.
    ///
    /// Returns `None` when the `(turma_id, scheduled_date, start_time)` key
    /// is already taken; the caller records the occurrence as skipped.
    pub async fn insert_generated(
        pool: &PgPool,
        tenant_id: DbId,
        turma_id: DbId,
        new: &NewLesson,
    ) -> Result<Option<Lesson>, sqlx::Error> {
        let query = format!(
            "INSERT INTO lessons \
                 (tenant_id, turma_id, scheduled_date, start_time, end_date, end_time, \
                  status_id, lesson_number, instructor_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (turma_id, scheduled_date, start_time) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(tenant_id)
            .bind(turma_id)
            .bind(new.scheduled_date)
            .bind(new.start_time)
            .bind(new.end_date)
            .bind(new.end_time)
            .bind(LessonStatus::Scheduled.id())
            .bind(new.lesson_number)
            .bind(new.instructor_id)
            .fetch_optional(pool)
            .await
    }

    /// Highest lesson number already assigned in the turma, 0 when none.
    pub async fn max_lesson_number(
        pool: &PgPool,
        tenant_id: DbId,
        turma_id: DbId,
    ) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COALESCE(MAX(lesson_number), 0) FROM lessons \
             WHERE tenant_id = $1 AND turma_id = $2",
        )
        .bind(tenant_id)
        .bind(turma_id)
        .fetch_one(pool)
        .await
    }

    /// Find a lesson by ID within a tenant.
    pub async fn find_by_id(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<Lesson>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lessons WHERE tenant_id = $1 AND id = $2");
        sqlx::query_as::<_, Lesson>(&query)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a lesson by its `(turma_id, scheduled_date, start_time)` key.
    ///
    /// Generation uses this to recover the surviving row after losing an
    /// insert race on the uniqueness key.
    pub async fn find_by_slot(
        pool: &PgPool,
        tenant_id: DbId,
        turma_id: DbId,
        scheduled_date: NaiveDate,
        start_time: chrono::NaiveTime,
    ) -> Result<Option<Lesson>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lessons \
             WHERE tenant_id = $1 AND turma_id = $2 \
               AND scheduled_date = $3 AND start_time = $4"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(tenant_id)
            .bind(turma_id)
            .bind(scheduled_date)
            .bind(start_time)
            .fetch_optional(pool)
            .await
    }

    /// List a turma's lessons with optional date range and status filter.
    pub async fn list_for_turma(
        pool: &PgPool,
        tenant_id: DbId,
        turma_id: DbId,
        filters: &LessonFilters,
    ) -> Result<Vec<Lesson>, sqlx::Error> {
        let limit = filters.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = filters.offset.unwrap_or(0).max(0);

        // Build the WHERE clause and track the next bind parameter index.
        let mut conditions = vec!["tenant_id = $1".to_string(), "turma_id = $2".to_string()];
        let mut bind_idx: u32 = 3;

        if filters.from.is_some() {
            conditions.push(format!("scheduled_date >= ${bind_idx}"));
            bind_idx += 1;
        }
        if filters.to.is_some() {
            conditions.push(format!("scheduled_date < ${bind_idx}"));
            bind_idx += 1;
        }
        if filters.status_id.is_some() {
            conditions.push(format!("status_id = ${bind_idx}"));
            bind_idx += 1;
        }

        let query = format!(
            "SELECT {COLUMNS} FROM lessons \
             WHERE {} \
             ORDER BY scheduled_date, start_time, lesson_number \
             LIMIT ${bind_idx} OFFSET ${}",
            conditions.join(" AND "),
            bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, Lesson>(&query).bind(tenant_id).bind(turma_id);
        if let Some(from) = filters.from {
            q = q.bind(from);
        }
        if let Some(to) = filters.to {
            q = q.bind(to);
        }
        if let Some(status_id) = filters.status_id {
            q = q.bind(status_id);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// All of a turma's lessons dated at or after `from`, any status.
    ///
    /// Generation reconciles against this set; cancelled lessons must be
    /// included because their keys stay occupied.
    pub async fn list_from_date(
        pool: &PgPool,
        tenant_id: DbId,
        turma_id: DbId,
        from: NaiveDate,
    ) -> Result<Vec<Lesson>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lessons \
             WHERE tenant_id = $1 AND turma_id = $2 AND scheduled_date >= $3 \
             ORDER BY scheduled_date, start_time, lesson_number"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(tenant_id)
            .bind(turma_id)
            .bind(from)
            .fetch_all(pool)
            .await
    }

    /// Open (Scheduled or InProgress) lessons of a turma still ending at or
    /// after `min_end_date`. Candidates for resolution and check-in.
    pub async fn open_for_turma(
        pool: &PgPool,
        tenant_id: DbId,
        turma_id: DbId,
        min_end_date: NaiveDate,
    ) -> Result<Vec<Lesson>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lessons \
             WHERE tenant_id = $1 AND turma_id = $2 \
               AND status_id IN ($3, $4) \
               AND end_date >= $5 \
             ORDER BY scheduled_date, start_time, lesson_number"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(tenant_id)
            .bind(turma_id)
            .bind(LessonStatus::Scheduled.id())
            .bind(LessonStatus::InProgress.id())
            .bind(min_end_date)
            .fetch_all(pool)
            .await
    }

    /// Open lessons across every turma an instructor teaches, still ending
    /// at or after `min_end_date`.
    pub async fn open_for_instructor(
        pool: &PgPool,
        tenant_id: DbId,
        instructor_id: DbId,
        min_end_date: NaiveDate,
    ) -> Result<Vec<Lesson>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lessons \
             WHERE tenant_id = $1 AND instructor_id = $2 \
               AND status_id IN ($3, $4) \
               AND end_date >= $5 \
             ORDER BY scheduled_date, start_time, lesson_number"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(tenant_id)
            .bind(instructor_id)
            .bind(LessonStatus::Scheduled.id())
            .bind(LessonStatus::InProgress.id())
            .bind(min_end_date)
            .fetch_all(pool)
            .await
    }

    /// Open lessons of a tenant ending at or before `max_end_date`.
    /// Candidates for the auto-completion sweep.
    pub async fn overdue_candidates(
        pool: &PgPool,
        tenant_id: DbId,
        max_end_date: NaiveDate,
    ) -> Result<Vec<Lesson>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lessons \
             WHERE tenant_id = $1 \
               AND status_id IN ($2, $3) \
               AND end_date <= $4 \
             ORDER BY scheduled_date, start_time, lesson_number"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(tenant_id)
            .bind(LessonStatus::Scheduled.id())
            .bind(LessonStatus::InProgress.id())
            .bind(max_end_date)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Status transitions (compare-and-set)
    // -----------------------------------------------------------------------

    /// Scheduled -> InProgress, stamping `started_at`.
    pub async fn start(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<Lesson>, sqlx::Error> {
        let query = format!(
            "UPDATE lessons \
             SET status_id = $3, started_at = NOW() \
             WHERE tenant_id = $1 AND id = $2 AND status_id = $4 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(tenant_id)
            .bind(id)
            .bind(LessonStatus::InProgress.id())
            .bind(LessonStatus::Scheduled.id())
            .fetch_optional(pool)
            .await
    }

    /// InProgress -> Completed, stamping `completed_at` and freezing the
    /// attendance count.
    pub async fn finish(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<Lesson>, sqlx::Error> {
        let query = format!(
            "UPDATE lessons \
             SET status_id = $3, completed_at = NOW(), auto_completed = FALSE, \
                 attendance_count = ( \
                     SELECT COUNT(*)::INT FROM attendance_records ar \
                     WHERE ar.lesson_id = lessons.id \
                 ) \
             WHERE tenant_id = $1 AND id = $2 AND status_id = $4 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(tenant_id)
            .bind(id)
            .bind(LessonStatus::Completed.id())
            .bind(LessonStatus::InProgress.id())
            .fetch_optional(pool)
            .await
    }

    /// Scheduled or InProgress -> Completed on behalf of the sweep, flagged
    /// `auto_completed`.
    pub async fn auto_complete(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<Lesson>, sqlx::Error> {
        let query = format!(
            "UPDATE lessons \
             SET status_id = $3, completed_at = NOW(), auto_completed = TRUE, \
                 attendance_count = ( \
                     SELECT COUNT(*)::INT FROM attendance_records ar \
                     WHERE ar.lesson_id = lessons.id \
                 ) \
             WHERE tenant_id = $1 AND id = $2 AND status_id IN ($4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(tenant_id)
            .bind(id)
            .bind(LessonStatus::Completed.id())
            .bind(LessonStatus::Scheduled.id())
            .bind(LessonStatus::InProgress.id())
            .fetch_optional(pool)
            .await
    }

    /// Scheduled or InProgress -> Cancelled with an optional reason.
    pub async fn cancel(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
        reason: Option<&str>,
    ) -> Result<Option<Lesson>, sqlx::Error> {
        let query = format!(
            "UPDATE lessons \
             SET status_id = $3, cancelled_at = NOW(), cancel_reason = $4 \
             WHERE tenant_id = $1 AND id = $2 AND status_id IN ($5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(tenant_id)
            .bind(id)
            .bind(LessonStatus::Cancelled.id())
            .bind(reason)
            .bind(LessonStatus::Scheduled.id())
            .bind(LessonStatus::InProgress.id())
            .fetch_optional(pool)
            .await
    }

    /// Scheduled -> Cancelled, used by generation when a schedule change
    /// orphans a lesson. Started lessons are deliberately not candidates.
    pub async fn cancel_scheduled(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
        reason: &str,
    ) -> Result<Option<Lesson>, sqlx::Error> {
        let query = format!(
            "UPDATE lessons \
             SET status_id = $3, cancelled_at = NOW(), cancel_reason = $4 \
             WHERE tenant_id = $1 AND id = $2 AND status_id = $5 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(tenant_id)
            .bind(id)
            .bind(LessonStatus::Cancelled.id())
            .bind(reason)
            .bind(LessonStatus::Scheduled.id())
            .fetch_optional(pool)
            .await
    }

    /// Assign or clear the opaque lesson plan reference.
    pub async fn set_lesson_plan(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
        lesson_plan_id: Option<&str>,
    ) -> Result<Option<Lesson>, sqlx::Error> {
        let query = format!(
            "UPDATE lessons SET lesson_plan_id = $3 \
             WHERE tenant_id = $1 AND id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(tenant_id)
            .bind(id)
            .bind(lesson_plan_id)
            .fetch_optional(pool)
            .await
    }
}
