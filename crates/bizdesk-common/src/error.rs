//! Error types shared across Bizdesk crates

use thiserror::Error;

/// Result type alias for common operations
pub type Result<T> = std::result::Result<T, CommonError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    #[error("Unknown user role: {0}")]
    InvalidRole(String),

    #[error("Unknown verification status: {0}")]
    InvalidVerificationStatus(String),
}
