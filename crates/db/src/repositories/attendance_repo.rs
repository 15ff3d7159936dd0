//! Repository for the `attendance_records` table.
//!
//! The `uq_attendance_student_lesson` key is the duplicate-check-in guard:
//! the insert is conflict-tolerant and the loser of a concurrent double
//! check-in observes `None`, never an error.

use academy_core::checkin::CheckInMethod;
use academy_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::attendance::AttendanceRecord;

/// Column list for `attendance_records` queries.
const COLUMNS: &str = "\
    id, tenant_id, lesson_id, student_id, checked_in_at, method, \
    created_at, updated_at";

/// Provides operations for attendance records.
pub struct AttendanceRepo;

impl AttendanceRepo {
    /// Record a check-in. Returns `None` when the student is already
    /// checked in to the lesson.
    pub async fn check_in(
        pool: &PgPool,
        tenant_id: DbId,
        lesson_id: DbId,
        student_id: DbId,
        checked_in_at: Timestamp,
        method: CheckInMethod,
    ) -> Result<Option<AttendanceRecord>, sqlx::Error> {
        let query = format!(
            "INSERT INTO attendance_records \
                 (tenant_id, lesson_id, student_id, checked_in_at, method) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (student_id, lesson_id) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(tenant_id)
            .bind(lesson_id)
            .bind(student_id)
            .bind(checked_in_at)
            .bind(method.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Attendance records of a lesson in check-in order.
    pub async fn list_for_lesson(
        pool: &PgPool,
        tenant_id: DbId,
        lesson_id: DbId,
    ) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM attendance_records \
             WHERE tenant_id = $1 AND lesson_id = $2 \
             ORDER BY checked_in_at, id"
        );
        sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(tenant_id)
            .bind(lesson_id)
            .fetch_all(pool)
            .await
    }

    /// Number of check-ins recorded for a lesson.
    pub async fn count_for_lesson(
        pool: &PgPool,
        tenant_id: DbId,
        lesson_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM attendance_records \
             WHERE tenant_id = $1 AND lesson_id = $2",
        )
        .bind(tenant_id)
        .bind(lesson_id)
        .fetch_one(pool)
        .await
    }
}
