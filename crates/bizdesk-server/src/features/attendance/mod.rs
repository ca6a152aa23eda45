//! Verified attendance
//!
//! Check-in/check-out records carrying face-match and GPS evidence for later
//! fraud review. The verification status is stored as supplied by the
//! capture pipeline; only an admin correction changes it afterwards.

pub mod commands;
mod error;
pub mod queries;
pub mod routes;
mod store;
mod types;


pub use error::AttendanceError;
pub use store::{AttendanceStore, PgAttendanceStore};
pub use types::{
    AttendanceFilter, NewAttendance, VerifiedAttendance, ATTENDANCE_MODULE,
    ATTENDANCE_RECORD_TYPE, DEFAULT_ATTENDANCE_QUERY_LIMIT, DEFAULT_VERIFICATION_METHOD,
    MAX_ATTENDANCE_QUERY_LIMIT,
};
pub use routes::attendance_routes;
