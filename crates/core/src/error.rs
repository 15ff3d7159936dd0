//! Error types shared across the workspace.

use chrono::NaiveDateTime;

use crate::lifecycle::LessonStatus;
use crate::types::DbId;

/// Domain-level error taxonomy shared by every crate in the workspace.
///
/// Each variant maps to exactly one HTTP status/code pair in the api
/// crate's error mapper; nothing here is retried automatically.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid lesson transition: {} -> {}", from.name(), to.name())]
    InvalidTransition { from: LessonStatus, to: LessonStatus },

    #[error("No lesson eligible for check-in at {at}")]
    NoEligibleLesson { at: NaiveDateTime },

    #[error("Student {student_id} is already checked in to lesson {lesson_id}")]
    DuplicateCheckIn { student_id: DbId, lesson_id: DbId },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
