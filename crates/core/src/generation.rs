//! Lesson generation planning: reconcile expanded occurrences against
//! stored lessons.
//!
//! Pure set reconciliation over the `(scheduled_date, start_time)` key. The
//! api crate's generation engine executes the plan with conflict-tolerant
//! inserts and compare-and-set cancellations; nothing here touches storage.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveTime};

use crate::expander::Occurrence;
use crate::lesson::LessonWindow;
use crate::lifecycle::LessonStatus;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Plan types
// ---------------------------------------------------------------------------

/// An occurrence to materialize as a new lesson, with its assigned number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedLesson {
    pub occurrence: Occurrence,
    pub lesson_number: i32,
}

/// The reconciliation outcome: lessons to insert, lessons left untouched,
/// lessons to cancel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationPlan {
    /// Occurrences with no stored counterpart, numbered chronologically.
    pub create: Vec<PlannedLesson>,
    /// Ids of stored lessons whose key matched an occurrence. Their status,
    /// instructor edits, and lesson plan assignment are preserved as-is.
    pub skip: Vec<DbId>,
    /// Ids of Scheduled lessons inside the window that no longer appear in
    /// the expansion. Cancellation, never deletion.
    pub cancel: Vec<DbId>,
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

/// Build a generation plan for one turma.
///
/// `expanded` must be in chronological order (as produced by
/// [`crate::expander::expand`]); new lessons are numbered in that order
/// starting at `max_lesson_number + 1`. `existing` are the turma's stored
/// lessons from `window_start` onward. Only Scheduled lessons dated inside
/// `[window_start, horizon_end)` are candidates for cancellation; lessons at
/// or beyond the horizon, and lessons in any other status, are never
/// touched.
///
/// Two occurrences sharing a key (identical overlapping slots) both plan a
/// create; the unique key on stored lessons downgrades the loser to a skip
/// at execution time.
pub fn plan(
    expanded: &[Occurrence],
    existing: &[LessonWindow],
    window_start: NaiveDate,
    horizon_end: NaiveDate,
    max_lesson_number: i32,
) -> GenerationPlan {
    let existing_by_key: HashMap<(NaiveDate, NaiveTime), DbId> =
        existing.iter().map(|l| (l.key(), l.id)).collect();
    let expanded_keys: HashSet<(NaiveDate, NaiveTime)> =
        expanded.iter().map(|o| o.key()).collect();

    let mut create = Vec::new();
    let mut skip = Vec::new();
    let mut next_number = max_lesson_number + 1;

    for occurrence in expanded {
        match existing_by_key.get(&occurrence.key()) {
            Some(&id) => skip.push(id),
            None => {
                create.push(PlannedLesson {
                    occurrence: *occurrence,
                    lesson_number: next_number,
                });
                next_number += 1;
            }
        }
    }

    let cancel = existing
        .iter()
        .filter(|l| l.status == LessonStatus::Scheduled)
        .filter(|l| l.date >= window_start && l.date < horizon_end)
        .filter(|l| !expanded_keys.contains(&l.key()))
        .map(|l| l.id)
        .collect();

    GenerationPlan { create, skip, cancel }
}
