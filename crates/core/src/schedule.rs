//! Weekly schedule definitions: slots, effective windows, authoring rules.
//!
//! A definition is the recurring weekly template for one turma. Expansion
//! into dated occurrences lives in [`crate::expander`]; this module holds the
//! value objects and the validation applied when a definition is authored or
//! replaced. Dates and times are tenant-local wall clock.

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Longest slot accepted at authoring. Keeps occurrence end dates within one
/// midnight rollover of the start date.
pub const MAX_SLOT_DURATION_MINUTES: u32 = 24 * 60;

// ---------------------------------------------------------------------------
// Weekday mapping
// ---------------------------------------------------------------------------

/// Map a stored day-of-week index (0 = Sunday .. 6 = Saturday) to a weekday.
///
/// Written out explicitly: chrono's own `TryFrom<u8>` is Monday-based and
/// would shift every slot by one day.
pub fn weekday_from_sunday_index(index: i16) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Inverse of [`weekday_from_sunday_index`] for storage.
pub fn sunday_index(weekday: Weekday) -> i16 {
    weekday.num_days_from_sunday() as i16
}

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

/// One recurring weekly time block, e.g. "Tuesday 18:00 for 60 minutes".
///
/// `position` preserves the authored order and breaks ordering ties between
/// slots that start at the same wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    pub day_of_week: Weekday,
    pub start_time: NaiveTime,
    pub duration_minutes: u32,
    pub position: i32,
}

impl ScheduleSlot {
    /// Build a slot, rejecting zero and over-long durations.
    pub fn new(
        day_of_week: Weekday,
        start_time: NaiveTime,
        duration_minutes: u32,
        position: i32,
    ) -> Result<Self, CoreError> {
        if duration_minutes == 0 {
            return Err(CoreError::Validation(
                "Slot duration must be at least one minute".to_string(),
            ));
        }
        if duration_minutes > MAX_SLOT_DURATION_MINUTES {
            return Err(CoreError::Validation(format!(
                "Slot duration must be at most {MAX_SLOT_DURATION_MINUTES} minutes, got {duration_minutes}"
            )));
        }
        Ok(Self {
            day_of_week,
            start_time,
            duration_minutes,
            position,
        })
    }
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// A turma's recurring weekly schedule with its effective date window.
///
/// The window is half-open: a date `d` is covered when
/// `effective_from <= d` and (`effective_until` is absent or
/// `d < effective_until`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleDefinition {
    pub id: DbId,
    pub turma_id: DbId,
    pub effective_from: NaiveDate,
    pub effective_until: Option<NaiveDate>,
    pub slots: Vec<ScheduleSlot>,
}

impl ScheduleDefinition {
    /// Whether `date` falls inside the effective window.
    pub fn covers(&self, date: NaiveDate) -> bool {
        if date < self.effective_from {
            return false;
        }
        match self.effective_until {
            Some(until) => date < until,
            None => true,
        }
    }
}

/// Authoring-time validation for a new or replacement definition.
///
/// Enforced here and only here; expansion assumes a valid definition and
/// never re-checks.
pub fn validate_definition(definition: &ScheduleDefinition) -> Result<(), CoreError> {
    if definition.slots.is_empty() {
        return Err(CoreError::Validation(
            "Schedule must define at least one slot".to_string(),
        ));
    }
    if let Some(until) = definition.effective_until {
        if until < definition.effective_from {
            return Err(CoreError::Validation(format!(
                "effective_until ({until}) must not be before effective_from ({})",
                definition.effective_from
            )));
        }
    }
    Ok(())
}
