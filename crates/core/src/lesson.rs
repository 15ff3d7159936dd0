//! Lesson window projection shared by the resolver, sweep, and check-in
//! logic.
//!
//! The engines in the api crate load full lesson rows; the pure functions
//! here only need the scheduling window, number, and status, so they take
//! this narrow Copy projection instead.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::lifecycle::LessonStatus;
use crate::types::DbId;

/// The slice of a stored lesson the pure engines operate on.
///
/// Times are tenant-local wall clock; `end_date` differs from `date` only
/// for lessons that cross midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LessonWindow {
    pub id: DbId,
    pub lesson_number: i32,
    pub status: LessonStatus,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_date: NaiveDate,
    pub end_time: NaiveTime,
}

impl LessonWindow {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.end_date.and_time(self.end_time)
    }

    /// Whether `at` falls inside the half-open window `[start, end)`.
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.starts_at() <= at && at < self.ends_at()
    }

    /// The generation identity key `(scheduled_date, start_time)`.
    pub fn key(&self) -> (NaiveDate, NaiveTime) {
        (self.date, self.start_time)
    }
}
