//! Check-in command
//!
//! Opens a verified attendance record for the requester. The capture
//! pipeline on the device supplies the face and location evidence; this
//! command only range-checks it and stores it as given.

use bizdesk_common::types::VerificationStatus;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::audit::{AuditAction, AuditStore};
use crate::auth::{authorize, Operation, Requester};
use crate::db::DbError;
use crate::features::attendance::{
    AttendanceError, AttendanceStore, NewAttendance, VerifiedAttendance,
    DEFAULT_VERIFICATION_METHOD,
};
use crate::features::shared::validation::{
    non_blank, validate_non_negative, validate_range, ValidationError,
};

/// Body of `POST /api/attendance/verified/check-in`
///
/// Every field is optional. `verification_status` defaults to `VERIFIED`
/// and is stored as supplied, regardless of the verification flags.
///
/// # Examples
///
/// ```rust,ignore
/// let command = CheckInCommand {
///     face_confidence: Some(93.5),
///     face_verified: true,
///     latitude: Some(13.0827),
///     longitude: Some(80.2707),
///     location_accuracy: Some(12.0),
///     location_type: Some("ROOFTOP".to_string()),
///     location_verified: true,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckInCommand {
    pub face_image_path: Option<String>,
    pub face_confidence: Option<f64>,
    pub face_verified: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub formatted_address: Option<String>,
    pub location_accuracy: Option<f64>,
    pub location_type: Option<String>,
    pub place_id: Option<String>,
    pub location_verified: bool,
    pub verification_method: Option<String>,
    pub verification_status: VerificationStatus,
    pub device_info: Option<String>,
    pub mock_location_detected: bool,
    pub notes: Option<String>,
    pub verification_data: Option<serde_json::Value>,
}

impl CheckInCommand {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_range("face_confidence", self.face_confidence, 0.0, 100.0)?;
        validate_range("latitude", self.latitude, -90.0, 90.0)?;
        validate_range("longitude", self.longitude, -180.0, 180.0)?;
        validate_non_negative("location_accuracy", self.location_accuracy)?;
        Ok(())
    }

    fn into_new(self, employee_id: i64, ip_address: Option<String>) -> NewAttendance {
        NewAttendance {
            employee_id,
            face_image_path: self.face_image_path,
            face_confidence: self.face_confidence,
            face_verified: self.face_verified,
            latitude: self.latitude,
            longitude: self.longitude,
            address: self.address,
            formatted_address: self.formatted_address,
            location_accuracy: self.location_accuracy,
            location_type: self.location_type,
            place_id: self.place_id,
            location_verified: self.location_verified,
            verification_method: non_blank(self.verification_method)
                .unwrap_or_else(|| DEFAULT_VERIFICATION_METHOD.to_string()),
            verification_status: self.verification_status,
            device_info: self.device_info,
            ip_address,
            mock_location_detected: self.mock_location_detected,
            notes: self.notes,
            verification_data: self.verification_data,
        }
    }
}

#[tracing::instrument(
    skip(attendance, audit, requester, command),
    fields(employee_id = requester.user_id)
)]
pub async fn handle(
    attendance: &dyn AttendanceStore,
    audit: &dyn AuditStore,
    requester: &Requester,
    command: CheckInCommand,
) -> Result<VerifiedAttendance, AttendanceError> {
    authorize(Operation::CheckIn, requester.role)?;
    command.validate()?;

    let employee_id = requester.user_id;
    let record = attendance
        .insert(command.into_new(employee_id, requester.ip_address.clone()))
        .await
        .map_err(|e| match e {
            DbError::Conflict(_) => AttendanceError::AlreadyCheckedIn(employee_id),
            other => other.into(),
        })?;

    tracing::info!(
        attendance_id = record.id,
        status = %record.verification_status,
        "Employee checked in"
    );

    super::record_audit(
        audit,
        requester,
        AuditAction::CheckIn,
        record.id,
        json!({
            "check_in_time": record.check_in_time,
            "face_verified": record.face_verified,
            "location_verified": record.location_verified,
            "mock_location_detected": record.mock_location_detected,
            "verification_status": record.verification_status,
        }),
    )
    .await;

    Ok(record)
}
