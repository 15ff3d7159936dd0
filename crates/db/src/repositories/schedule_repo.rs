//! Repository for `schedule_definitions` and `schedule_slots`.
//!
//! A turma has at most one current definition (`replaced_at IS NULL`,
//! enforced by `uq_schedule_definitions_current`). Replacement stamps the
//! old row and inserts the new one in a single transaction; history rows
//! are never deleted.

use academy_core::types::DbId;
use sqlx::PgPool;

use crate::models::schedule::{ReplaceSchedule, ScheduleDefinition, ScheduleSlot};

/// Column list for `schedule_definitions` queries.
const DEFINITION_COLUMNS: &str = "\
    id, tenant_id, turma_id, effective_from, effective_until, replaced_at, \
    created_at, updated_at";

/// Column list for `schedule_slots` queries.
const SLOT_COLUMNS: &str = "\
    id, schedule_definition_id, day_of_week, start_time, duration_minutes, \
    position, created_at, updated_at";

/// Provides operations for schedule definitions and their slots.
pub struct ScheduleRepo;

impl ScheduleRepo {
    /// The turma's current definition, if any.
    pub async fn current_for_turma(
        pool: &PgPool,
        tenant_id: DbId,
        turma_id: DbId,
    ) -> Result<Option<ScheduleDefinition>, sqlx::Error> {
        let query = format!(
            "SELECT {DEFINITION_COLUMNS} FROM schedule_definitions \
             WHERE tenant_id = $1 AND turma_id = $2 AND replaced_at IS NULL"
        );
        sqlx::query_as::<_, ScheduleDefinition>(&query)
            .bind(tenant_id)
            .bind(turma_id)
            .fetch_optional(pool)
            .await
    }

    /// Slots of a definition in authored order.
    pub async fn slots_for_definition(
        pool: &PgPool,
        definition_id: DbId,
    ) -> Result<Vec<ScheduleSlot>, sqlx::Error> {
        let query = format!(
            "SELECT {SLOT_COLUMNS} FROM schedule_slots \
             WHERE schedule_definition_id = $1 \
             ORDER BY position, id"
        );
        sqlx::query_as::<_, ScheduleSlot>(&query)
            .bind(definition_id)
            .fetch_all(pool)
            .await
    }

    /// Replace the turma's current definition transactionally.
    ///
    /// The previous current definition (if any) gets `replaced_at` stamped;
    /// the new definition and its slots are inserted. Returns the new
    /// definition with its slots. Input is assumed validated.
    pub async fn replace(
        pool: &PgPool,
        tenant_id: DbId,
        turma_id: DbId,
        input: &ReplaceSchedule,
    ) -> Result<(ScheduleDefinition, Vec<ScheduleSlot>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "UPDATE schedule_definitions SET replaced_at = NOW() \
             WHERE tenant_id = $1 AND turma_id = $2 AND replaced_at IS NULL",
        )
        .bind(tenant_id)
        .bind(turma_id)
        .execute(&mut *tx)
        .await?;

        let insert_definition = format!(
            "INSERT INTO schedule_definitions \
                 (tenant_id, turma_id, effective_from, effective_until) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {DEFINITION_COLUMNS}"
        );
        let definition = sqlx::query_as::<_, ScheduleDefinition>(&insert_definition)
            .bind(tenant_id)
            .bind(turma_id)
            .bind(input.effective_from)
            .bind(input.effective_until)
            .fetch_one(&mut *tx)
            .await?;

        let insert_slot = format!(
            "INSERT INTO schedule_slots \
                 (schedule_definition_id, day_of_week, start_time, duration_minutes, position) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {SLOT_COLUMNS}"
        );
        let mut slots = Vec::with_capacity(input.slots.len());
        for (position, slot) in input.slots.iter().enumerate() {
            let row = sqlx::query_as::<_, ScheduleSlot>(&insert_slot)
                .bind(definition.id)
                .bind(slot.day_of_week)
                .bind(slot.start_time)
                .bind(slot.duration_minutes)
                .bind(position as i32)
                .fetch_one(&mut *tx)
                .await?;
            slots.push(row);
        }

        tx.commit().await?;
        Ok((definition, slots))
    }
}
