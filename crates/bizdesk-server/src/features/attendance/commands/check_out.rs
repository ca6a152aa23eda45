//! Check-out command
//!
//! Closes an open attendance record. Only the employee who checked in may
//! close it.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::audit::{AuditAction, AuditStore};
use crate::auth::{authorize, AccessDenied, Operation, Requester};
use crate::features::attendance::{AttendanceError, AttendanceStore, VerifiedAttendance};
use crate::features::shared::validation::non_blank;

/// Body of `PUT /api/attendance/verified/:id/check-out`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckOutCommand {
    /// Appended to the record's notes on a new line when present
    pub notes: Option<String>,
}

#[tracing::instrument(
    skip(attendance, audit, requester, command),
    fields(employee_id = requester.user_id)
)]
pub async fn handle(
    attendance: &dyn AttendanceStore,
    audit: &dyn AuditStore,
    requester: &Requester,
    attendance_id: i64,
    command: CheckOutCommand,
) -> Result<VerifiedAttendance, AttendanceError> {
    authorize(Operation::CheckOut, requester.role)?;

    let existing = attendance
        .find(attendance_id)
        .await?
        .ok_or(AttendanceError::NotFound(attendance_id))?;

    if existing.employee_id != requester.user_id {
        return Err(AccessDenied::new(Operation::CheckOut, requester.role).into());
    }
    if !existing.is_open() {
        return Err(AttendanceError::AlreadyCheckedOut(attendance_id));
    }

    // A concurrent check-out can win between the read and this update
    let record = attendance
        .check_out(attendance_id, non_blank(command.notes))
        .await?
        .ok_or(AttendanceError::AlreadyCheckedOut(attendance_id))?;

    tracing::info!(attendance_id, "Employee checked out");

    super::record_audit(
        audit,
        requester,
        AuditAction::CheckOut,
        record.id,
        json!({ "check_out_time": record.check_out_time }),
    )
    .await;

    Ok(record)
}
