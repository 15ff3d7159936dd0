//! Check-in eligibility: which lesson does an attendance event belong to.
//!
//! A check-in during a lesson belongs to that lesson. Outside any window the
//! tenant's grace settings decide: an upcoming lesson can be checked into a
//! little early, a just-ended one a little late. All times are tenant-local
//! wall clock; the api crate's check-in engine handles persistence and the
//! duplicate guard.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::lesson::LessonWindow;
use crate::lifecycle::LessonStatus;
use crate::resolver::resolve;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Method
// ---------------------------------------------------------------------------

/// How an attendance record was captured. Stored as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInMethod {
    Manual,
    Biometric,
    Kiosk,
}

impl CheckInMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Biometric => "biometric",
            Self::Kiosk => "kiosk",
        }
    }

    /// Parse the stored/wire form.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            "manual" => Ok(Self::Manual),
            "biometric" => Ok(Self::Biometric),
            "kiosk" => Ok(Self::Kiosk),
            _ => Err(format!(
                "Invalid check-in method '{s}'. Must be one of: manual, biometric, kiosk"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Grace windows
// ---------------------------------------------------------------------------

/// Tenant-configured grace minutes around a lesson window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckInWindows {
    /// Minutes before the scheduled start during which check-in is accepted.
    pub early_minutes: i64,
    /// Minutes after the scheduled end during which check-in is accepted.
    pub late_minutes: i64,
}

/// Distance from `at` to the lesson's own `[start, end)` window. Zero inside
/// the window.
fn window_distance(lesson: &LessonWindow, at: NaiveDateTime) -> Duration {
    if at < lesson.starts_at() {
        lesson.starts_at() - at
    } else if at >= lesson.ends_at() {
        at - lesson.ends_at()
    } else {
        Duration::zero()
    }
}

/// Rank for distance ties, mirroring the resolver's preference for a lesson
/// that is actually running.
fn status_rank(status: LessonStatus) -> u8 {
    match status {
        LessonStatus::InProgress => 0,
        _ => 1,
    }
}

/// Pick the lesson an attendance event at `at` belongs to.
///
/// The resolver's current lesson always wins. Failing that, the candidates
/// are Scheduled or InProgress lessons whose grace window
/// `[start - early, end + late]` contains `at`; the one closest to its own
/// scheduled window is chosen, ties broken like the resolver. No candidate
/// means no eligible lesson.
pub fn eligible_lesson(
    lessons: &[LessonWindow],
    at: NaiveDateTime,
    windows: CheckInWindows,
) -> Result<DbId, CoreError> {
    if let Some(current) = resolve(lessons, at).current {
        return Ok(current.id);
    }

    let early = Duration::minutes(windows.early_minutes);
    let late = Duration::minutes(windows.late_minutes);

    lessons
        .iter()
        .filter(|l| {
            matches!(
                l.status,
                LessonStatus::Scheduled | LessonStatus::InProgress
            )
        })
        .filter(|l| l.starts_at() - early <= at && at <= l.ends_at() + late)
        .min_by_key(|l| {
            (
                window_distance(l, at),
                status_rank(l.status),
                l.starts_at(),
                l.lesson_number,
            )
        })
        .map(|l| l.id)
        .ok_or(CoreError::NoEligibleLesson { at })
}
