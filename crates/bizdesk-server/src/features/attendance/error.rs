use thiserror::Error;

use crate::auth::AccessDenied;
use crate::db::DbError;
use crate::error::AppError;
use crate::features::shared::validation::ValidationError;

/// Errors returned by attendance commands and queries
#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error(transparent)]
    Forbidden(#[from] AccessDenied),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Attendance record {0} not found")]
    NotFound(i64),

    #[error("Employee {0} already has an open check-in")]
    AlreadyCheckedIn(i64),

    #[error("Attendance record {0} is already checked out")]
    AlreadyCheckedOut(i64),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<AttendanceError> for AppError {
    fn from(err: AttendanceError) -> Self {
        match err {
            AttendanceError::Forbidden(denied) => AppError::Forbidden(denied),
            AttendanceError::Validation(e) => AppError::Validation(e.to_string()),
            e @ AttendanceError::NotFound(_) => AppError::NotFound(e.to_string()),
            e @ (AttendanceError::AlreadyCheckedIn(_) | AttendanceError::AlreadyCheckedOut(_)) => {
                AppError::Conflict(e.to_string())
            },
            AttendanceError::Database(e) => e.into(),
        }
    }
}
