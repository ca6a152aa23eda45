use thiserror::Error;

use crate::auth::AccessDenied;
use crate::db::DbError;
use crate::error::AppError;
use crate::features::shared::validation::ValidationError;

/// Errors returned by the audit log queries
#[derive(Debug, Error)]
pub enum AuditQueryError {
    #[error(transparent)]
    Forbidden(#[from] AccessDenied),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<AuditQueryError> for AppError {
    fn from(err: AuditQueryError) -> Self {
        match err {
            AuditQueryError::Forbidden(denied) => AppError::Forbidden(denied),
            AuditQueryError::Validation(e) => AppError::Validation(e.to_string()),
            AuditQueryError::Database(e) => e.into(),
        }
    }
}
