//! Lesson entity models and DTOs.

use academy_core::error::CoreError;
use academy_core::lesson::LessonWindow;
use academy_core::lifecycle::{LessonStatus, StatusId};
use academy_core::types::{DbId, Timestamp};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// A row from the `lessons` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lesson {
    pub id: DbId,
    pub tenant_id: DbId,
    pub turma_id: DbId,
    pub scheduled_date: NaiveDate,
    pub start_time: NaiveTime,
    /// Day after `scheduled_date` for lessons that cross midnight.
    pub end_date: NaiveDate,
    pub end_time: NaiveTime,
    pub status_id: StatusId,
    /// Sequential within the turma, assigned at generation, never reused.
    pub lesson_number: i32,
    pub instructor_id: DbId,
    /// Opaque reference to external lesson content. Never interpreted here.
    pub lesson_plan_id: Option<String>,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub cancelled_at: Option<Timestamp>,
    pub cancel_reason: Option<String>,
    /// True when the sweep closed the lesson out rather than an instructor.
    pub auto_completed: bool,
    /// Frozen at completion from the attendance records.
    pub attendance_count: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Lesson {
    /// Typed status, if the stored id maps to a known state.
    pub fn status(&self) -> Option<LessonStatus> {
        LessonStatus::from_id(self.status_id)
    }

    /// Project into the window form consumed by the pure engines.
    pub fn to_window(&self) -> Result<LessonWindow, CoreError> {
        let status = self.status().ok_or_else(|| {
            CoreError::Internal(format!(
                "Lesson {} has unknown status id {}",
                self.id, self.status_id
            ))
        })?;
        Ok(LessonWindow {
            id: self.id,
            lesson_number: self.lesson_number,
            status,
            date: self.scheduled_date,
            start_time: self.start_time,
            end_date: self.end_date,
            end_time: self.end_time,
        })
    }
}

/// Query parameters for `GET /api/v1/turmas/{id}/lessons`.
#[derive(Debug, Default, Deserialize)]
pub struct LessonListQuery {
    /// Inclusive lower bound on `scheduled_date`.
    pub from: Option<NaiveDate>,
    /// Exclusive upper bound on `scheduled_date`.
    pub to: Option<NaiveDate>,
    /// Wire-form status filter (`scheduled`, `in_progress`, ...).
    pub status: Option<String>,
    /// Maximum number of results. Defaults to 100, capped at 500.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Body of `POST /api/v1/turmas/{id}/lessons/generate`.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateLessons {
    /// Exclusive end of the generation window. Defaults to the tenant-local
    /// today plus the tenant's horizon_days.
    pub horizon_end: Option<NaiveDate>,
}

/// Body of `POST /api/v1/lessons/{id}/cancel`.
#[derive(Debug, Default, Deserialize)]
pub struct CancelLesson {
    pub reason: Option<String>,
}

/// Body of `PATCH /api/v1/lessons/{id}`.
///
/// `lesson_plan_id` distinguishes "absent" (leave unchanged) from
/// "present and null" (clear the assignment).
#[derive(Debug, Default, Deserialize)]
pub struct UpdateLesson {
    #[serde(default, deserialize_with = "double_option")]
    pub lesson_plan_id: Option<Option<String>>,
}

/// Query parameters for the current/next resolution endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ResolveQuery {
    /// Resolution instant. Defaults to the server clock.
    pub at: Option<Timestamp>,
}

/// Body of `POST /api/v1/admin/sweep/auto-complete`.
#[derive(Debug, Default, Deserialize)]
pub struct SweepRequest {
    /// Sweep instant. Defaults to the server clock.
    pub at: Option<Timestamp>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}
