//! API response types

use serde::{Deserialize, Serialize};

/// Standard error response body
///
/// ```json
/// { "error": { "code": "FORBIDDEN", "message": "Only admin can view audit statistics", "status": 403 } }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub status: u16,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>, status: u16) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                status,
            },
        }
    }
}
