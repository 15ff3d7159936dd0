//! Current/next lesson resolution for a set of lesson windows.
//!
//! Total over any input: no clock access, no errors, empty input resolves to
//! nothing. The caller decides which lessons to consider (one turma, or all
//! turmas of an instructor) and what "now" means.

use chrono::NaiveDateTime;

use crate::lesson::LessonWindow;
use crate::lifecycle::LessonStatus;

/// Outcome of resolving a point in time against a set of lessons.
///
/// Both sides are optional and independent: mid-lesson there is usually a
/// `current` and a `next`, between lessons only a `next`, after the last
/// lesson neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resolution {
    pub current: Option<LessonWindow>,
    pub next: Option<LessonWindow>,
}

/// Ordering rank for current-lesson ties: a lesson already running beats one
/// that merely should be.
fn current_rank(status: LessonStatus) -> u8 {
    match status {
        LessonStatus::InProgress => 0,
        _ => 1,
    }
}

/// Resolve the current and next lesson at `now`.
///
/// `current` is a Scheduled or InProgress lesson whose `[start, end)` window
/// contains `now`; ties prefer InProgress, then the earliest start, then the
/// lowest lesson number. `next` is the Scheduled lesson with the smallest
/// start strictly after `now`, ties by lesson number. Completed and
/// Cancelled lessons are never part of a resolution.
pub fn resolve(lessons: &[LessonWindow], now: NaiveDateTime) -> Resolution {
    let current = lessons
        .iter()
        .filter(|l| {
            matches!(
                l.status,
                LessonStatus::Scheduled | LessonStatus::InProgress
            )
        })
        .filter(|l| l.contains(now))
        .min_by_key(|l| (current_rank(l.status), l.starts_at(), l.lesson_number))
        .copied();

    let next = lessons
        .iter()
        .filter(|l| l.status == LessonStatus::Scheduled)
        .filter(|l| l.starts_at() > now)
        .min_by_key(|l| (l.starts_at(), l.lesson_number))
        .copied();

    Resolution { current, next }
}
