//! Verified attendance records and the inputs that produce them

use bizdesk_common::types::VerificationStatus;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Default number of attendance records returned per list call
pub const DEFAULT_ATTENDANCE_QUERY_LIMIT: i64 = 100;

/// Maximum number of attendance records returned per list call
pub const MAX_ATTENDANCE_QUERY_LIMIT: i64 = 1000;

/// Method recorded when the client does not name one
pub const DEFAULT_VERIFICATION_METHOD: &str = "BIOMETRIC_GPS";

/// Module name used for attendance audit entries
pub const ATTENDANCE_MODULE: &str = "attendance";

/// Record type used for attendance audit entries
pub const ATTENDANCE_RECORD_TYPE: &str = "verified_attendance";

/// One biometric + GPS verified check-in, later closed by a check-out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct VerifiedAttendance {
    pub id: i64,
    pub employee_id: i64,
    pub check_in_time: DateTime<Utc>,
    /// `None` while the employee is still checked in
    pub check_out_time: Option<DateTime<Utc>>,

    pub face_image_path: Option<String>,
    /// Match score from the capture pipeline, 0 to 100
    pub face_confidence: Option<f64>,
    pub face_verified: bool,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub formatted_address: Option<String>,
    /// Reported GPS accuracy in meters
    pub location_accuracy: Option<f64>,
    /// Geocoder precision, e.g. `ROOFTOP` or `APPROXIMATE`
    pub location_type: Option<String>,
    pub place_id: Option<String>,
    pub location_verified: bool,

    pub verification_method: String,
    #[sqlx(try_from = "String")]
    pub verification_status: VerificationStatus,

    pub device_info: Option<String>,
    pub ip_address: Option<String>,
    pub mock_location_detected: bool,

    pub notes: Option<String>,
    /// Raw capture payload kept for fraud review
    pub verification_data: Option<serde_json::Value>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VerifiedAttendance {
    pub fn is_open(&self) -> bool {
        self.check_out_time.is_none()
    }
}

/// Row to insert on check-in. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewAttendance {
    pub employee_id: i64,
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
    pub verification_method: String,
    pub verification_status: VerificationStatus,
    pub device_info: Option<String>,
    pub ip_address: Option<String>,
    pub mock_location_detected: bool,
    pub notes: Option<String>,
    pub verification_data: Option<serde_json::Value>,
}

/// Filters for listing attendance. `None` means "don't filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceFilter {
    pub employee_id: Option<i64>,
    /// Calendar day (UTC) of the check-in
    pub date: Option<NaiveDate>,
    pub status: Option<VerificationStatus>,
}

impl AttendanceFilter {
    /// Half-open UTC range `[start, end)` covering `date`
    pub fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = date.and_time(NaiveTime::MIN).and_utc();
        (start, start + TimeDelta::days(1))
    }

    #[cfg(test)]
    pub fn matches(&self, record: &VerifiedAttendance) -> bool {
        self.employee_id.map_or(true, |id| record.employee_id == id)
            && self
                .date
                .map_or(true, |d| record.check_in_time.date_naive() == d)
            && self
                .status
                .map_or(true, |s| record.verification_status == s)
    }
}
