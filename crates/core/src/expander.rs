//! Schedule expansion: recurring weekly template -> dated occurrences.
//!
//! Pure and deterministic. The caller supplies the date range; nothing here
//! reads a clock. Range semantics are half-open `[from, to)` so adjacent
//! expansion windows never overlap.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::schedule::{ScheduleDefinition, ScheduleSlot};

// ---------------------------------------------------------------------------
// Occurrence
// ---------------------------------------------------------------------------

/// A single dated class occurrence produced by expansion.
///
/// `end_date` is the day after `date` when the slot crosses midnight,
/// otherwise equal to `date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_date: NaiveDate,
    pub end_time: NaiveTime,
}

impl Occurrence {
    fn from_slot(date: NaiveDate, slot: &ScheduleSlot) -> Self {
        let start = date.and_time(slot.start_time);
        let end = start + Duration::minutes(i64::from(slot.duration_minutes));
        Self {
            date,
            start_time: slot.start_time,
            end_date: end.date(),
            end_time: end.time(),
        }
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.end_date.and_time(self.end_time)
    }

    /// True when the occurrence ends on the day after it starts.
    pub fn crosses_midnight(&self) -> bool {
        self.end_date > self.date
    }

    /// Identity of an occurrence within its turma. Matches the
    /// `(scheduled_date, start_time)` uniqueness key on stored lessons.
    pub fn key(&self) -> (NaiveDate, NaiveTime) {
        (self.date, self.start_time)
    }
}

// ---------------------------------------------------------------------------
// Expansion
// ---------------------------------------------------------------------------

/// Expand a definition over `[from, to)` into dated occurrences.
///
/// Emits one occurrence per day in the range, per slot whose weekday matches,
/// provided the definition's effective window covers the day. Overlapping
/// slots are all emitted; reconciliation against stored lessons happens
/// later, in generation. Output is ordered by (date, start_time) with the
/// authored slot order breaking start-time ties.
pub fn expand(definition: &ScheduleDefinition, from: NaiveDate, to: NaiveDate) -> Vec<Occurrence> {
    if from >= to || definition.slots.is_empty() {
        return Vec::new();
    }

    let mut slots: Vec<&ScheduleSlot> = definition.slots.iter().collect();
    slots.sort_by_key(|s| s.position);

    let mut occurrences = Vec::new();
    for date in from.iter_days().take_while(|d| *d < to) {
        if !definition.covers(date) {
            continue;
        }
        for slot in &slots {
            if slot.day_of_week == date.weekday() {
                occurrences.push(Occurrence::from_slot(date, slot));
            }
        }
    }

    // Generation order is day-major / position-minor, so this stable sort
    // yields (date, start_time, position) overall.
    occurrences.sort_by_key(|o| (o.date, o.start_time));
    occurrences
}
