//! Admin correction of a verification status

use bizdesk_common::types::VerificationStatus;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::audit::{AuditAction, AuditStore};
use crate::auth::{authorize, Operation, Requester};
use crate::features::attendance::{AttendanceError, AttendanceStore, VerifiedAttendance};
use crate::features::shared::validation::require_text;

/// Body of `PUT /api/attendance/verified/:id/correct`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectAttendanceCommand {
    pub status: VerificationStatus,
    /// Appended to the record's notes; must not be blank
    pub reason: String,
}

impl CorrectAttendanceCommand {
    fn note(&self, reason: &str, username: &str) -> String {
        format!("Status corrected to {} by {}: {}", self.status, username, reason)
    }
}

#[tracing::instrument(
    skip(attendance, audit, requester, command),
    fields(requester_id = requester.user_id, status = %command.status)
)]
pub async fn handle(
    attendance: &dyn AttendanceStore,
    audit: &dyn AuditStore,
    requester: &Requester,
    attendance_id: i64,
    command: CorrectAttendanceCommand,
) -> Result<VerifiedAttendance, AttendanceError> {
    authorize(Operation::CorrectAttendance, requester.role)?;
    let reason = require_text("reason", &command.reason)?;

    let previous = attendance
        .find(attendance_id)
        .await?
        .ok_or(AttendanceError::NotFound(attendance_id))?;

    let note = command.note(reason, &requester.username);
    let record = attendance
        .set_status(attendance_id, command.status, &note)
        .await?
        .ok_or(AttendanceError::NotFound(attendance_id))?;

    tracing::info!(
        attendance_id,
        from = %previous.verification_status,
        to = %record.verification_status,
        "Attendance status corrected"
    );

    super::record_audit(
        audit,
        requester,
        AuditAction::Correct,
        record.id,
        json!({
            "verification_status": {
                "from": previous.verification_status,
                "to": record.verification_status,
            },
            "reason": reason,
        }),
    )
    .await;

    Ok(record)
}
