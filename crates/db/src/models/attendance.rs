//! Attendance record models and DTOs.

use academy_core::checkin::CheckInMethod;
use academy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `attendance_records` table.
///
/// Records survive lesson cancellation; presence was a fact.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AttendanceRecord {
    pub id: DbId,
    pub tenant_id: DbId,
    pub lesson_id: DbId,
    pub student_id: DbId,
    pub checked_in_at: Timestamp,
    /// Capture method in wire form: `manual`, `biometric`, or `kiosk`.
    pub method: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body of `POST /api/v1/attendance/check-in`.
#[derive(Debug, Deserialize)]
pub struct CheckInRequest {
    pub student_id: DbId,
    pub turma_id: DbId,
    pub method: CheckInMethod,
    /// Check-in instant. Defaults to the server clock.
    pub at: Option<Timestamp>,
}
