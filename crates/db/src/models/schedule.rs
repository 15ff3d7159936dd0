//! Schedule definition and slot models.
//!
//! `day_of_week` is stored 0-based from Sunday. Conversion into the typed
//! core representation happens in [`ScheduleDefinition::to_core`] so the
//! index mapping lives in exactly one place on the read path.

use academy_core::error::CoreError;
use academy_core::schedule::{self, weekday_from_sunday_index};
use academy_core::types::{DbId, Timestamp};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `schedule_definitions` table.
///
/// `replaced_at IS NULL` marks the current definition; replaced rows are
/// kept as history.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScheduleDefinition {
    pub id: DbId,
    pub tenant_id: DbId,
    pub turma_id: DbId,
    pub effective_from: NaiveDate,
    pub effective_until: Option<NaiveDate>,
    pub replaced_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `schedule_slots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScheduleSlot {
    pub id: DbId,
    pub schedule_definition_id: DbId,
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub duration_minutes: i32,
    pub position: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ScheduleDefinition {
    /// Convert this row plus its slots into the core representation used by
    /// the expander.
    pub fn to_core(
        &self,
        slots: &[ScheduleSlot],
    ) -> Result<schedule::ScheduleDefinition, CoreError> {
        let slots = slots
            .iter()
            .map(|slot| {
                let day = weekday_from_sunday_index(slot.day_of_week).ok_or_else(|| {
                    CoreError::Internal(format!(
                        "Slot {} has out-of-range day_of_week {}",
                        slot.id, slot.day_of_week
                    ))
                })?;
                let minutes = u32::try_from(slot.duration_minutes).map_err(|_| {
                    CoreError::Internal(format!(
                        "Slot {} has negative duration {}",
                        slot.id, slot.duration_minutes
                    ))
                })?;
                schedule::ScheduleSlot::new(day, slot.start_time, minutes, slot.position)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(schedule::ScheduleDefinition {
            id: self.id,
            turma_id: self.turma_id,
            effective_from: self.effective_from,
            effective_until: self.effective_until,
            slots,
        })
    }
}

/// One slot in a schedule replacement request. `position` is taken from the
/// array order.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SlotInput {
    /// 0 = Sunday .. 6 = Saturday.
    #[validate(range(min = 0, max = 6))]
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    #[validate(range(min = 1, max = 1440))]
    pub duration_minutes: i32,
}

/// DTO for `PUT /api/v1/turmas/{id}/schedule`: replace the current
/// definition wholesale.
#[derive(Debug, Deserialize, Validate)]
pub struct ReplaceSchedule {
    pub effective_from: NaiveDate,
    pub effective_until: Option<NaiveDate>,
    #[validate(length(min = 1), nested)]
    pub slots: Vec<SlotInput>,
}

/// A definition together with its slots, as returned by the schedule
/// endpoints.
#[derive(Debug, Serialize)]
pub struct ScheduleWithSlots {
    #[serde(flatten)]
    pub definition: ScheduleDefinition,
    pub slots: Vec<ScheduleSlot>,
}
