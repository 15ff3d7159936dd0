//! Auto-completion sweep planning.
//!
//! Lessons whose window ended long enough ago without anyone finishing or
//! cancelling them are closed out automatically. Planning is pure; the api
//! crate executes each transition with a compare-and-set so concurrent
//! sweeps or a racing manual finish collapse to a single completion.

use chrono::{Duration, NaiveDateTime};

use crate::lesson::LessonWindow;
use crate::types::DbId;

/// Ids of lessons overdue for auto-completion at `now`.
///
/// A lesson qualifies when it is still Scheduled or InProgress and its
/// window end plus the grace period lies strictly before `now`. Input order
/// is preserved.
pub fn plan_auto_complete(
    lessons: &[LessonWindow],
    now: NaiveDateTime,
    grace_minutes: i64,
) -> Vec<DbId> {
    let grace = Duration::minutes(grace_minutes);
    lessons
        .iter()
        .filter(|l| !l.status.is_terminal())
        .filter(|l| l.ends_at() + grace < now)
        .map(|l| l.id)
        .collect()
}
