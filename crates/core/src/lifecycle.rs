//! Lesson lifecycle state machine.
//!
//! Status ids match the `lesson_statuses` seed data (1-based SMALLSERIAL).
//! Status is only ever mutated through the transitions validated here; the
//! api crate enforces them with compare-and-set updates so a losing
//! concurrent caller observes `InvalidTransition` instead of a double
//! side effect.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Status id type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

/// Lifecycle state of a single lesson occurrence.
///
/// Discriminants are the `lesson_statuses` seed ids.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonStatus {
    Scheduled = 1,
    InProgress = 2,
    Completed = 3,
    Cancelled = 4,
}

impl LessonStatus {
    /// Return the database status id.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Map a database status id back to the enum.
    pub fn from_id(id: StatusId) -> Option<Self> {
        match id {
            1 => Some(Self::Scheduled),
            2 => Some(Self::InProgress),
            3 => Some(Self::Completed),
            4 => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Wire/query-parameter form (`scheduled`, `in_progress`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse the wire form. Returns an error message listing valid values.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!(
                "Invalid lesson status '{s}'. Must be one of: scheduled, in_progress, completed, cancelled"
            )),
        }
    }

    /// Human-readable name for error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::InProgress => "InProgress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Completed and Cancelled are absorbing: nothing moves a lesson out.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl From<LessonStatus> for StatusId {
    fn from(value: LessonStatus) -> Self {
        value as StatusId
    }
}

/// Returns the set of states reachable from `from`.
///
/// Scheduled -> InProgress (start), Completed (sweep auto-completion),
/// Cancelled. InProgress -> Completed (finish or sweep), Cancelled.
/// Terminal states return an empty slice.
pub fn valid_transitions(from: LessonStatus) -> &'static [LessonStatus] {
    match from {
        LessonStatus::Scheduled => &[
            LessonStatus::InProgress,
            LessonStatus::Completed,
            LessonStatus::Cancelled,
        ],
        LessonStatus::InProgress => &[LessonStatus::Completed, LessonStatus::Cancelled],
        LessonStatus::Completed | LessonStatus::Cancelled => &[],
    }
}

/// Check whether a transition from `from` to `to` is legal.
pub fn can_transition(from: LessonStatus, to: LessonStatus) -> bool {
    valid_transitions(from).contains(&to)
}

/// Validate a transition, returning `InvalidTransition` for illegal ones.
pub fn validate_transition(from: LessonStatus, to: LessonStatus) -> Result<(), CoreError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Valid transitions
    // -----------------------------------------------------------------------

    #[test]
    fn scheduled_to_in_progress() {
        assert!(can_transition(LessonStatus::Scheduled, LessonStatus::InProgress));
    }

    #[test]
    fn scheduled_to_completed() {
        // Sweep auto-completion skips the InProgress step.
        assert!(can_transition(LessonStatus::Scheduled, LessonStatus::Completed));
    }

    #[test]
    fn scheduled_to_cancelled() {
        assert!(can_transition(LessonStatus::Scheduled, LessonStatus::Cancelled));
    }

    #[test]
    fn in_progress_to_completed() {
        assert!(can_transition(LessonStatus::InProgress, LessonStatus::Completed));
    }

    #[test]
    fn in_progress_to_cancelled() {
        assert!(can_transition(LessonStatus::InProgress, LessonStatus::Cancelled));
    }

    // -----------------------------------------------------------------------
    // Terminal states are absorbing
    // -----------------------------------------------------------------------

    #[test]
    fn completed_has_no_transitions() {
        assert!(valid_transitions(LessonStatus::Completed).is_empty());
    }

    #[test]
    fn cancelled_has_no_transitions() {
        assert!(valid_transitions(LessonStatus::Cancelled).is_empty());
    }

    #[test]
    fn completed_to_cancelled_invalid() {
        // A finished class must not be un-completed.
        assert!(!can_transition(LessonStatus::Completed, LessonStatus::Cancelled));
    }

    #[test]
    fn completed_to_in_progress_invalid() {
        assert!(!can_transition(LessonStatus::Completed, LessonStatus::InProgress));
    }

    #[test]
    fn cancelled_to_scheduled_invalid() {
        assert!(!can_transition(LessonStatus::Cancelled, LessonStatus::Scheduled));
    }

    // -----------------------------------------------------------------------
    // Invalid non-terminal transitions
    // -----------------------------------------------------------------------

    #[test]
    fn in_progress_to_scheduled_invalid() {
        assert!(!can_transition(LessonStatus::InProgress, LessonStatus::Scheduled));
    }

    #[test]
    fn scheduled_to_scheduled_invalid() {
        assert!(!can_transition(LessonStatus::Scheduled, LessonStatus::Scheduled));
    }

    // -----------------------------------------------------------------------
    // validate_transition carries both states in the error
    // -----------------------------------------------------------------------

    #[test]
    fn validate_transition_ok() {
        assert!(validate_transition(LessonStatus::Scheduled, LessonStatus::InProgress).is_ok());
    }

    #[test]
    fn validate_transition_err_names_states() {
        let err = validate_transition(LessonStatus::Completed, LessonStatus::InProgress)
            .unwrap_err()
            .to_string();
        assert!(err.contains("Completed"));
        assert!(err.contains("InProgress"));
    }

    // -----------------------------------------------------------------------
    // Id mapping matches seed data
    // -----------------------------------------------------------------------

    #[test]
    fn status_ids_match_seed_data() {
        assert_eq!(LessonStatus::Scheduled.id(), 1);
        assert_eq!(LessonStatus::InProgress.id(), 2);
        assert_eq!(LessonStatus::Completed.id(), 3);
        assert_eq!(LessonStatus::Cancelled.id(), 4);
    }

    #[test]
    fn from_id_round_trips() {
        for status in [
            LessonStatus::Scheduled,
            LessonStatus::InProgress,
            LessonStatus::Completed,
            LessonStatus::Cancelled,
        ] {
            assert_eq!(LessonStatus::from_id(status.id()), Some(status));
        }
    }

    #[test]
    fn from_id_rejects_unknown() {
        assert_eq!(LessonStatus::from_id(0), None);
        assert_eq!(LessonStatus::from_id(99), None);
    }

    #[test]
    fn wire_form_round_trips() {
        for status in [
            LessonStatus::Scheduled,
            LessonStatus::InProgress,
            LessonStatus::Completed,
            LessonStatus::Cancelled,
        ] {
            assert_eq!(LessonStatus::from_str_value(status.as_str()), Ok(status));
        }
    }

    #[test]
    fn from_str_value_rejects_unknown() {
        let err = LessonStatus::from_str_value("paused").unwrap_err();
        assert!(err.contains("paused"));
        assert!(err.contains("scheduled"));
    }

    #[test]
    fn terminal_flags() {
        assert!(!LessonStatus::Scheduled.is_terminal());
        assert!(!LessonStatus::InProgress.is_terminal());
        assert!(LessonStatus::Completed.is_terminal());
        assert!(LessonStatus::Cancelled.is_terminal());
    }
}
